//! Scoped, all-or-nothing host mutation.

use std::ops::{Deref, DerefMut};

use crate::errors::HostError;
use crate::log::debug;

use super::Host;

/// An open host scope.
///
/// Dropping the guard without calling [`commit`](Transaction::commit) rolls
/// the scope back, so an early `?` return never leaves partial mutations
/// behind.
pub struct Transaction<'h, H: Host + ?Sized> {
    host: &'h mut H,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    name: String,
    open: bool,
}

impl<'h, H: Host + ?Sized> Transaction<'h, H> {
    pub fn start(host: &'h mut H, name: impl Into<String>) -> Result<Self, HostError> {
        let name = name.into();
        host.begin_scope(&name)?;
        debug!(scope = %name, "scope started");
        Ok(Self { host, name, open: true })
    }

    pub fn commit(mut self) -> Result<(), HostError> {
        self.open = false;
        debug!(scope = %self.name, "scope committed");
        self.host.commit_scope()
    }

    pub fn rollback(mut self) {
        self.open = false;
        debug!(scope = %self.name, "scope rolled back");
        self.host.rollback_scope();
    }
}

impl<H: Host + ?Sized> Deref for Transaction<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: Host + ?Sized> DerefMut for Transaction<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: Host + ?Sized> Drop for Transaction<'_, H> {
    fn drop(&mut self) {
        if self.open {
            debug!(scope = %self.name, "scope dropped open, rolling back");
            self.host.rollback_scope();
        }
    }
}
