// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod export;
mod topics;

pub use export::ExportCmd;
pub use topics::TopicsCmd;
