//! Domain entities for Smart Remote.
//!
//! This module contains pure data types with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code:
//!
//! - Describes the things the application is about: TV brands, TV devices on
//!   the network, and the user's remote preferences.
//! - Has **no** imports from network libraries, storage, or UI frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Code in outer layers (brand clients, the control router, storage) depends
//! on the domain, but the domain never depends on them.

pub mod brand;
pub mod device;
pub mod settings;
