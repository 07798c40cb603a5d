pub mod owo;
