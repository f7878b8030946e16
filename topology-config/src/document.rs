//! Wire shape of a topology document, before any resolution.
//!
//! Field names here are the external contract. Every section is optional and
//! an explicit `null` is treated like an absent value, including entries inside
//! maps and lists. Map sections reject a key that appears twice.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::subject::SubjectName;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawDocument {
    #[serde(default, deserialize_with = "unique_map")]
    pub directories: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "unique_map")]
    pub extensions: BTreeMap<String, String>,

    /// Document-wide subject defaults
    #[serde(
        rename = "Subject",
        alias = "subject",
        default,
        deserialize_with = "null_as_default"
    )]
    pub subject: SubjectName,

    #[serde(default, deserialize_with = "string_list")]
    pub keyfiles: Vec<String>,

    #[serde(default, deserialize_with = "unique_map")]
    pub certificates: BTreeMap<String, RawCertificate>,

    #[serde(default, deserialize_with = "combo_map")]
    pub combos: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawCertificate {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub type_tag: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub issuer: String,

    #[serde(
        rename = "Subject",
        alias = "subject",
        default,
        deserialize_with = "null_as_default"
    )]
    pub subject: SubjectName,

    #[serde(default, deserialize_with = "string_list")]
    pub hosts: Vec<String>,
}

impl RawCertificate {
    pub fn new(type_tag: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            issuer: issuer.into(),
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, subject: SubjectName) -> Self {
        self.subject = subject;
        self
    }

    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A value that reads `null` as `T::default()`.
struct OrDefault<T>(T);

impl<'de, T> Deserialize<'de> for OrDefault<T>
where
    T: Default + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        null_as_default(deserializer).map(OrDefault)
    }
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<OrDefault<String>> = null_as_default(deserializer)?;
    Ok(items.into_iter().map(|OrDefault(item)| item).collect())
}

/// Name-keyed map that fails on a repeated key.
struct UniqueMap<V>(BTreeMap<String, V>);

impl<'de, V> Deserialize<'de> for UniqueMap<V>
where
    V: Default + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UniqueMapVisitor<V>(PhantomData<V>);

        impl<'de, V> Visitor<'de> for UniqueMapVisitor<V>
        where
            V: Default + Deserialize<'de>,
        {
            type Value = UniqueMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with unique keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = BTreeMap::new();
                while let Some(key) = access.next_key::<String>()? {
                    let OrDefault(value) = access.next_value::<OrDefault<V>>()?;
                    match entries.entry(key) {
                        Entry::Occupied(slot) => {
                            return Err(de::Error::custom(format!(
                                "duplicate entry with key '{}'",
                                slot.key()
                            )));
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(value);
                        }
                    }
                }
                Ok(UniqueMap(entries))
            }
        }

        deserializer.deserialize_map(UniqueMapVisitor(PhantomData))
    }
}

fn unique_map<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Default + Deserialize<'de>,
{
    Ok(Option::<UniqueMap<V>>::deserialize(deserializer)?
        .map(|UniqueMap(entries)| entries)
        .unwrap_or_default())
}

fn combo_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let combos: BTreeMap<String, Vec<OrDefault<String>>> = unique_map(deserializer)?;
    Ok(combos
        .into_iter()
        .map(|(name, members)| {
            let members = members.into_iter().map(|OrDefault(member)| member).collect();
            (name, members)
        })
        .collect())
}
