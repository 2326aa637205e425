use crate::{registry::UserRegistry, tokens::TokenConfig};

pub(crate) struct AppState {
    pub(crate) users: UserRegistry,
    pub(crate) tokens: TokenConfig,
}
