//! Language plugins. Each submodule provides its stage providers and a
//! `register` function that adds them, their default chain and their
//! schemes to a [`crate::registry::RegistryBuilder`].

pub mod zh;
