// SPDX-License-Identifier: MIT

//! HTTP middleware: authentication and security headers.

pub mod auth;
pub mod security;
