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

//! Distinguished name chain matching.
//!
//! A DN chain is an ordered sequence of RFC 2253 distinguished names, for
//! example the signer chain of an X.509 certificate. A chain pattern is a
//! semicolon-separated sequence of DN patterns with three wildcard forms:
//! `*` for zero or one DN, `-` for zero or more DNs, a leading `*,` for
//! any number of leading RDNs within one DN, and `=*` for any value of a
//! single RDN component.
//!
//! ```
//! use ldapmatch_dn::match_distinguished_name_chain;
//!
//! let chain = ["cn=Bugs Bunny,o=ACME,c=US"];
//! assert!(match_distinguished_name_chain("*, o=ACME, c=US", &chain).unwrap());
//! assert!(!match_distinguished_name_chain("*, o=ACME, c=FR", &chain).unwrap());
//! ```
//!
//! Both sides are brought into canonical form before comparison, so
//! spacing and case differences outside of escaped content are ignored.

pub mod canonical;
pub mod chain;
pub mod matcher;

pub use canonical::canonicalize;
pub use chain::DnChain;
pub use chain::DnChainPattern;
pub use matcher::match_distinguished_name_chain;
