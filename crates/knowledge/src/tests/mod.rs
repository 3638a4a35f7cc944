//! Service-level tests with in-process collaborators.
