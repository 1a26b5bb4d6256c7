pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod purge;
pub mod schedule;
pub mod store;
pub mod types;

pub use error::{ConfigError, PurgeError, StoreError};
pub use purge::{PurgeReport, Purger};
pub use store::{DeleteBatch, SuggestionStore};

#[macro_export]
macro_rules! clone_into_closure {
    ( ($( $x:ident ),*) $y:expr ) => {
        {
            $(let $x = $x.clone();)*
            $y
        }
    };
}
