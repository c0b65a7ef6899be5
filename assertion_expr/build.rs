// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    expression: ExpressionLimits,
    evaluation: EvaluationLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct ExpressionLimits {
    max_expression_length: usize,
    max_token_count: usize,
    max_string_size: usize,
    max_parse_depth: usize,
}

#[derive(serde::Deserialize)]
struct EvaluationLimits {
    max_collection_size: usize,
    max_call_depth: usize,
    max_repeat_length: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=ASSERTION_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=ASSERTION_CONFIG_DIR");

    let profile =
        env::var("ASSERTION_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("ASSERTION_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Config lives at the workspace root, one level above this crate
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_EXPRESSION_LENGTH: usize = 1_000_000;
    const ABSOLUTE_MAX_PARSE_DEPTH: usize = 256;
    const ABSOLUTE_MAX_REPEAT_LENGTH: usize = 100_000_000;

    if config.expression.max_expression_length > ABSOLUTE_MAX_EXPRESSION_LENGTH {
        panic!("LIMITS: max_expression_length exceeds absolute maximum");
    }

    if config.expression.max_parse_depth > ABSOLUTE_MAX_PARSE_DEPTH {
        panic!("LIMITS: max_parse_depth exceeds absolute maximum");
    }

    if config.expression.max_parse_depth == 0 || config.evaluation.max_call_depth == 0 {
        panic!("LIMITS: depth limits must be non-zero");
    }

    if config.evaluation.max_repeat_length > ABSOLUTE_MAX_REPEAT_LENGTH {
        panic!("LIMITS: max_repeat_length exceeds absolute maximum");
    }

    if config.logging.log_buffer_size < 100 {
        panic!("LIMITS: log_buffer_size must be at least 100");
    }

    if profile == "production" && config.expression.max_expression_length > 65_536 {
        panic!("PRODUCTION: max_expression_length too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod expression {{
        pub const MAX_EXPRESSION_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const MAX_STRING_SIZE: usize = {};
        pub const MAX_PARSE_DEPTH: usize = {};
    }}

    pub mod evaluation {{
        pub const MAX_COLLECTION_SIZE: usize = {};
        pub const MAX_CALL_DEPTH: usize = {};
        pub const MAX_REPEAT_LENGTH: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        // Expression
        config.expression.max_expression_length,
        config.expression.max_token_count,
        config.expression.max_string_size,
        config.expression.max_parse_depth,
        // Evaluation
        config.evaluation.max_collection_size,
        config.evaluation.max_call_depth,
        config.evaluation.max_repeat_length,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
