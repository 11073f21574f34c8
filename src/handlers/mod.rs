// handlers/mod.rs - HTTP handlers, one module per route family
//
// Generic resource routes live in `crud`; everything else is a narrow,
// resource-specific operation wired up explicitly in `app.rs`.

pub mod auth;
pub mod crud;
pub mod dashboard;
pub mod health;
pub mod mock;
pub mod nav_history;
pub mod notifications;
pub mod portfolio;
pub mod trades;
