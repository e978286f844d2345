// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2021 Profian, Inc.

mod digest;
pub mod gcr;
pub mod plugin;

pub use self::digest::Digest;
