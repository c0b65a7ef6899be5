//! Named bit-flag sets
//!
//! A `FlagSet` carries its declared members so that symbolic names survive
//! being passed around as a plain value.

use super::ComparisonError;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagSet {
    type_name: String,
    members: Vec<(String, u64)>,
    bits: u64,
}

impl FlagSet {
    /// Empty set of the given flag type
    pub fn new<I, S>(type_name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            type_name: type_name.into(),
            members: members
                .into_iter()
                .map(|(name, bit)| (name.into(), bit))
                .collect(),
            bits: 0,
        }
    }

    /// Same flag type with exactly `names` set
    pub fn with_flags<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, ComparisonError> {
        let mut bits = 0;
        for name in names {
            bits |= self.bit_of(name.as_ref())?;
        }
        Ok(self.with_bits(bits))
    }

    pub fn with_bits(&self, bits: u64) -> Self {
        Self {
            type_name: self.type_name.clone(),
            members: self.members.clone(),
            bits,
        }
    }

    /// Single-member value for `name`
    pub fn member(&self, name: &str) -> Result<Self, ComparisonError> {
        Ok(self.with_bits(self.bit_of(name)?))
    }

    fn bit_of(&self, name: &str) -> Result<u64, ComparisonError> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, bit)| *bit)
            .ok_or_else(|| ComparisonError::UnknownFlag {
                flag_type: self.type_name.clone(),
                name: name.to_string(),
            })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(name, _)| name.as_str())
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Names of the declared members whose bits are all set
    pub fn flag_names(&self) -> BTreeSet<String> {
        self.members
            .iter()
            .filter(|(_, bit)| *bit != 0 && self.bits & bit == *bit)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn is_subset_of(&self, other: &FlagSet) -> bool {
        self.bits & other.bits == self.bits
    }

    pub fn union(&self, other: &FlagSet) -> Result<Self, ComparisonError> {
        self.check_same_type(other)?;
        Ok(self.with_bits(self.bits | other.bits))
    }

    pub fn intersection(&self, other: &FlagSet) -> Result<Self, ComparisonError> {
        self.check_same_type(other)?;
        Ok(self.with_bits(self.bits & other.bits))
    }

    pub fn same_type(&self, other: &FlagSet) -> bool {
        self.type_name == other.type_name
    }

    fn check_same_type(&self, other: &FlagSet) -> Result<(), ComparisonError> {
        if self.same_type(other) {
            Ok(())
        } else {
            Err(ComparisonError::FlagTypeMismatch {
                left: self.type_name.clone(),
                right: other.type_name.clone(),
            })
        }
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .members
            .iter()
            .filter(|(_, bit)| *bit != 0 && self.bits & bit == *bit)
            .map(|(name, _)| name.as_str())
            .collect();

        if names.is_empty() {
            write!(f, "{}({})", self.type_name, self.bits)
        } else {
            write!(f, "{}.{}", self.type_name, names.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permissions() -> FlagSet {
        FlagSet::new("Permission", [("READ", 1), ("WRITE", 2), ("EXECUTE", 4)])
    }

    #[test]
    fn test_with_flags_and_names() {
        let rw = permissions().with_flags(&["READ", "WRITE"]).unwrap();
        assert_eq!(rw.bits(), 3);
        assert_eq!(
            rw.flag_names().into_iter().collect::<Vec<_>>(),
            vec!["READ".to_string(), "WRITE".to_string()]
        );
        assert_eq!(rw.to_string(), "Permission.READ|WRITE");
        assert_eq!(permissions().to_string(), "Permission(0)");
    }

    #[test]
    fn test_unknown_member_is_rejected() {
        let err = permissions().with_flags(&["DELETE"]).unwrap_err();
        assert!(err.to_string().contains("DELETE"));
    }

    #[test]
    fn test_set_operations() {
        let base = permissions();
        let read = base.member("READ").unwrap();
        let rw = base.with_flags(&["READ", "WRITE"]).unwrap();

        assert!(read.is_subset_of(&rw));
        assert_eq!(read.union(&base.member("EXECUTE").unwrap()).unwrap().bits(), 5);
        assert_eq!(rw.intersection(&read).unwrap(), read);

        let other = FlagSet::new("Color", [("RED", 1)]);
        assert!(read.union(&other).is_err());
    }
}
