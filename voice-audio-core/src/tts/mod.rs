pub mod stream_decoder;
