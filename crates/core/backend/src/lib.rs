#[macro_use]
extern crate async_recursion;

#[macro_use]
extern crate async_trait;

#[macro_use]
extern crate log;

#[macro_use]
extern crate campusfix_result;

pub use campusfix_models::v0;

macro_rules! backend_derived {
    ( $( $item:item )+ ) => {
        $(
            #[derive(Clone)]
            $item
        )+
    };
}

mod drivers;
pub use drivers::*;

mod models;
pub use models::*;

pub mod util;
