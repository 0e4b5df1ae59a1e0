//! Domain identifiers (strongly-typed IDs).
//!
//! - `TabId`: ブラウザが払い出すタブのハンドル（外部所有・不透明）
//! - `NotificationId`: ULID ベースの通知 ID
//!
//! ## Phantom Type パターン
//! `Id<T>` というジェネリック型で共通実装を提供しつつ、
//! `T` は実行時には使わない（PhantomData）マーカー型として、
//! コンパイル時の型安全性を提供します。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::num::ParseIntError;
use std::str::FromStr;
use ulid::Ulid;

/// Handle of a browser tab.
///
/// Owned by the browser: unique while the tab exists. The coordinator never
/// interprets the value, it only uses it as a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(u64);

impl TabId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TabId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"notif-" など）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// `T` は PhantomData で、実行時にはメモリを消費しませんが、
/// コンパイル時に型安全性を提供します。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Marker for user-visible notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Notification {}

impl IdMarker for Notification {
    fn prefix() -> &'static str {
        "notif-"
    }
}

/// Identifier of a notification shown to the user.
pub type NotificationId = Id<Notification>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn tab_id_parses_and_displays_raw_number() {
        let id: TabId = " 42 ".parse().unwrap();
        assert_eq!(id, TabId::new(42));
        assert_eq!(id.to_string(), "42");
        assert!("tab-1".parse::<TabId>().is_err());
    }

    #[test]
    fn tab_id_works_as_json_map_key() {
        // The persisted map is keyed by tab id; JSON object keys are strings.
        let mut map = BTreeMap::new();
        map.insert(TabId::new(7), "x");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"7":"x"}"#);

        let back: BTreeMap<TabId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&TabId::new(7)).map(String::as_str), Some("x"));
    }

    #[test]
    fn notification_ids_carry_prefix() {
        let ulid = Ulid::new();
        let id = NotificationId::from_ulid(ulid);
        assert_eq!(id.as_ulid(), ulid);
        assert!(id.to_string().starts_with("notif-"));
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;
        assert_eq!(size_of::<NotificationId>(), size_of::<Ulid>());
    }
}
