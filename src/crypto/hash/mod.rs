pub mod sm3;
