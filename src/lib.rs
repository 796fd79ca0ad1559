#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_yaml_event as event;
pub use vc_yaml_serial as serial;

pub use vc_yaml_serial::{Error, Result, Serializer};
