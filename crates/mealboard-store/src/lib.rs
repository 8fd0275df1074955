// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod choice;
mod error;
mod guard;
mod registration;
mod registry;
mod schema;
mod store;
mod versions;

pub use error::StoreError;
pub use schema::SCHEMA_VERSION;
pub use store::{PutChoiceOutcome, Store};
