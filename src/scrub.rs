//! `Secret<T>`: a scrub-on-drop wrapper for any `Zeroize` value, for a type
//! like [`crate::poly::small::PolyZ`] that derives `Zeroize` but isn't
//! always secret, so can't wire up `#[zeroize(drop)]` unconditionally the
//! way [`crate::rng::EntropySource`] does.

use std::fmt;
use std::ops::{Deref, DerefMut};
use zeroize::Zeroize;

pub struct Secret<T: Zeroize>(Option<T>);

impl<T: Zeroize> Secret<T> {
    pub fn new(value: T) -> Self {
        Self(Some(value))
    }

    /// Consumes the wrapper and hands back the value without scrubbing it;
    /// the caller takes over responsibility for zeroizing it.
    pub fn into_inner(mut self) -> T {
        self.0.take().expect("Secret value taken twice")
    }
}

impl<T: Zeroize> Deref for Secret<T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.0.as_ref().expect("Secret value taken twice")
    }
}

impl<T: Zeroize> DerefMut for Secret<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.0.as_mut().expect("Secret value taken twice")
    }
}

impl<T: Zeroize> Drop for Secret<T> {
    fn drop(&mut self) {
        if let Some(mut value) = self.0.take() {
            value.zeroize();
        }
    }
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}
