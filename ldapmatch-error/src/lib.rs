// Copyright 2025 The LdapMatch Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types shared by the ldapmatch crates.
//!
//! Two families of failures exist in this workspace:
//! - **Syntax errors** raised while parsing a filter string
//!   ([`FilterError`]) or a DN chain/pattern string ([`DnError`],
//!   [`DnParseError`]). These are fatal to the parse call and carry the
//!   offending input plus, where available, the remaining substring at the
//!   failure position.
//! - **Evaluation-time anomalies** (unparsable operands, type mismatches)
//!   never surface as errors at all; the evaluating crates degrade the
//!   affected comparison to `false` instead.

// Filter error module
pub mod filter_error;

// DN error module
pub mod dn_error;

pub use dn_error::DnError;
pub use dn_error::DnParseError;
pub use dn_error::DnResult;
pub use filter_error::FilterError;
pub use filter_error::FilterResult;
