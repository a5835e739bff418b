use serde::{Deserialize, Serialize};
use std::fmt;

use crate::params::ParamSpec;
use crate::types::param::{Param, ParamType, ParamValue, UnknownParam};

/// Ordered parameters of one value, known and unknown interleaved in wire
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamList(Vec<Param>);

impl ParamList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.0.iter()
    }

    pub fn push(&mut self, param: Param) {
        self.0.push(param);
    }

    /// Value of the first parameter of `kind`.
    pub fn find(&self, kind: ParamType) -> Option<&ParamValue> {
        self.0.iter().find_map(|p| match p {
            Param::Known { kind: k, value } if *k == kind => Some(value),
            _ => None,
        })
    }

    pub fn find_mut(&mut self, kind: ParamType) -> Option<&mut ParamValue> {
        self.0.iter_mut().find_map(|p| match p {
            Param::Known { kind: k, value } if *k == kind => Some(value),
            _ => None,
        })
    }

    /// First unknown parameter called `name`, ignoring ASCII case.
    pub fn find_unknown(&self, name: &str) -> Option<&UnknownParam> {
        self.0.iter().find_map(|p| match p {
            Param::Unknown(u) if u.name.eq_ignore_ascii_case(name) => Some(u),
            _ => None,
        })
    }

    pub fn exists(&self, kind: ParamType) -> bool {
        self.find(kind).is_some()
    }

    /// Replace the first parameter of `kind`, or append one.
    pub fn set(&mut self, kind: ParamType, value: ParamValue) {
        match self.find_mut(kind) {
            Some(existing) => *existing = value,
            None => self.0.push(Param::known(kind, value)),
        }
    }

    /// Typed value of the first `P` parameter.
    pub fn typed<P: ParamSpec>(&self) -> Option<&P::Value> {
        self.find(P::KIND).and_then(P::get)
    }

    /// Typed value of `P`, inserting its default first if absent (or if
    /// present with another shape). `None` only for a `ParamSpec` whose
    /// `wrap` and `get_mut` disagree.
    pub fn typed_mut<P: ParamSpec>(&mut self) -> Option<&mut P::Value> {
        if self.typed::<P>().is_none() {
            self.set(P::KIND, P::wrap(P::Value::default()));
        }
        self.find_mut(P::KIND).and_then(P::get_mut)
    }

    pub fn set_typed<P: ParamSpec>(&mut self, value: P::Value) {
        self.set(P::KIND, P::wrap(value));
    }

    /// Add a flag parameter unless one of `kind` is present.
    pub fn set_flag(&mut self, kind: ParamType) {
        if !self.exists(kind) {
            self.0.push(Param::known(kind, ParamValue::Exists));
        }
    }

    /// Removes every parameter of `kind`; returns whether any was present.
    pub fn remove(&mut self, kind: ParamType) -> bool {
        let before = self.0.len();
        self.0.retain(|p| p.kind() != Some(kind));
        self.0.len() != before
    }

    /// Removes every unknown parameter called `name`.
    pub fn remove_unknown(&mut self, name: &str) -> bool {
        let before = self.0.len();
        self.0
            .retain(|p| !matches!(p, Param::Unknown(u) if u.name.eq_ignore_ascii_case(name)));
        self.0.len() != before
    }

    pub fn unknown(&self) -> impl Iterator<Item = &UnknownParam> {
        self.0.iter().filter_map(|p| match p {
            Param::Unknown(u) => Some(u),
            Param::Known { .. } => None,
        })
    }

    /// Moves every unknown parameter out, keeping known ones in place.
    pub fn take_unknown(&mut self) -> Vec<UnknownParam> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.0.len());
        for param in self.0.drain(..) {
            match param {
                Param::Unknown(u) => taken.push(u),
                known => kept.push(known),
            }
        }
        self.0 = kept;
        taken
    }

    /// Same parameters irrespective of order.
    pub fn same_set(&self, other: &ParamList) -> bool {
        self.len() == other.len() && self.0.iter().all(|p| other.0.contains(p))
    }
}

impl fmt::Display for ParamList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for param in &self.0 {
            write!(f, ";{}", param)?;
        }
        Ok(())
    }
}

impl From<Vec<Param>> for ParamList {
    fn from(params: Vec<Param>) -> Self {
        Self(params)
    }
}

impl FromIterator<Param> for ParamList {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
