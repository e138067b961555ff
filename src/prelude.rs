pub use crate::base::{
    config::Config,
    types::{Err, Event, Message, Res, Void},
};
pub use anyhow::anyhow;
pub use tracing::{debug, error, info, instrument, warn};
