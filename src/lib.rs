//! bootenv - reader and writer for fixed-size bootloader environments
//!
//! A bootloader environment is a block of `key=value` strings behind a
//! CRC-32 header, padded with `0xFF` to a fixed size.
//!
//! ```no_run
//! use bootenv::env::EnvStore;
//!
//! # fn main() -> bootenv::env::EnvResult<()> {
//! let mut store = EnvStore::open("/boot/uboot.env")?;
//! store.set("bootdelay", "3")?;
//! store.save()?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod codec;
pub mod env;
pub mod observability;
