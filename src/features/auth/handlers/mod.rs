pub mod auth_handler;

pub use auth_handler::{
    __path_get_user, __path_login, __path_logout, __path_refresh_token, __path_register,
    __path_update_profile, get_user, login, logout, refresh_token, register, update_profile,
};
