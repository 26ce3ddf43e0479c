mod codec;
mod common;
