pub mod sleep;
