pub mod orchestrators;
