//! Extension type registry.
//!
//! Maps an extension type code to a pair of hooks: one turning a semantic
//! [`Value`] into the ext payload, one turning a payload back. Codes without
//! hooks are carried as raw [`Ext`](crate::Ext) values.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::constants::TIMESTAMP_EXT_TYPE;
use crate::{timestamp, MsgPackError, Value};

pub type EncodeHook = Arc<dyn Fn(&Value) -> Result<Vec<u8>, MsgPackError> + Send + Sync>;
pub type DecodeHook = Arc<dyn Fn(i8, &[u8]) -> Result<Value, MsgPackError> + Send + Sync>;

#[derive(Clone)]
pub struct ExtHooks {
    pub encode: EncodeHook,
    pub decode: DecodeHook,
}

impl fmt::Debug for ExtHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExtHooks { .. }")
    }
}

/// Extension hooks keyed by type code.
///
/// Registration takes `&mut self`: configure a registry first, then share it
/// (by reference or behind an `Arc`) with encoders and decoders. Codes
/// -128..=-1 are reserved by the format, 0..=127 belong to applications; the
/// registry accepts both so the built-in timestamp hook can be replaced.
#[derive(Clone)]
pub struct Registry {
    hooks: HashMap<i8, ExtHooks>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes: Vec<i8> = self.hooks.keys().copied().collect();
        codes.sort_unstable();
        f.debug_struct("Registry").field("codes", &codes).finish()
    }
}

impl Registry {
    /// A registry with the timestamp extension (type -1) installed.
    pub fn new() -> Self {
        let mut hooks = HashMap::new();
        hooks.insert(
            TIMESTAMP_EXT_TYPE,
            ExtHooks {
                encode: Arc::new(timestamp::encode_hook),
                decode: Arc::new(timestamp::decode_hook),
            },
        );
        Self { hooks }
    }

    /// A registry with no hooks; every ext decodes to a raw value.
    pub fn empty() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Process-wide default registry, equal to [`Registry::new`].
    pub fn standard() -> &'static Registry {
        static STANDARD: OnceLock<Registry> = OnceLock::new();
        STANDARD.get_or_init(Registry::new)
    }

    /// Installs hooks for `type_code`, returning the ones they replace.
    pub fn register<E, D>(
        &mut self,
        type_code: i64,
        encode: E,
        decode: D,
    ) -> Result<Option<ExtHooks>, MsgPackError>
    where
        E: Fn(&Value) -> Result<Vec<u8>, MsgPackError> + Send + Sync + 'static,
        D: Fn(i8, &[u8]) -> Result<Value, MsgPackError> + Send + Sync + 'static,
    {
        let code = i8::try_from(type_code).map_err(|_| MsgPackError::InvalidExtType(type_code))?;
        let previous = self.hooks.insert(
            code,
            ExtHooks {
                encode: Arc::new(encode),
                decode: Arc::new(decode),
            },
        );
        if previous.is_some() {
            debug!(type_code = code, "replaced extension hooks");
        } else {
            debug!(type_code = code, "registered extension hooks");
        }
        Ok(previous)
    }

    pub fn unregister(&mut self, type_code: i8) -> Option<ExtHooks> {
        let removed = self.hooks.remove(&type_code);
        if removed.is_some() {
            debug!(type_code, "unregistered extension hooks");
        }
        removed
    }

    pub fn contains(&self, type_code: i8) -> bool {
        self.hooks.contains_key(&type_code)
    }

    pub fn get(&self, type_code: i8) -> Option<&ExtHooks> {
        self.hooks.get(&type_code)
    }

    pub(crate) fn encode_ext(&self, type_code: i8, value: &Value) -> Result<Vec<u8>, MsgPackError> {
        let hooks = self
            .get(type_code)
            .ok_or(MsgPackError::UnregisteredExtension(type_code))?;
        (hooks.encode)(value)
    }

    /// Runs the decode hook, or `None` when `type_code` has none.
    pub(crate) fn decode_ext(
        &self,
        type_code: i8,
        payload: &[u8],
    ) -> Option<Result<Value, MsgPackError>> {
        self.get(type_code)
            .map(|hooks| (hooks.decode)(type_code, payload))
    }
}
