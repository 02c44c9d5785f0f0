mod config;
mod gif_encoder;
mod hotkey;
