// ABOUTME: API module containing the HTTP handler functions for the eventbook REST API.
// ABOUTME: Event listing, creation, lookup, and deletion live in the events sub-module.

pub mod events;
