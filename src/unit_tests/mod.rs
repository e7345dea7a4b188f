// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) mod fixtures;
mod invariant_tests;
