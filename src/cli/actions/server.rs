use crate::{
    api,
    cli::{actions::Action, globals::GlobalArgs},
};
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server { port, dsn } => api::new(port, dsn, globals).await,
    }
}
