pub mod shared_key_auth;
