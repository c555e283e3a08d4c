//! Authority constants for the internal services.
//!
//! These are the values carried in the token's `authorities` claim and in
//! the `X-Auth-Authorities` header.
//!
//! # Example
//!
//! ```ignore
//! use edgeguard_core::permissions;
//!
//! if identity.has_authority(permissions::PRODUCT_CREATE) {
//!     // Create product
//! }
//! ```

// =============================================================================
// Product permissions
// =============================================================================

/// Permission to create products
pub const PRODUCT_CREATE: &str = "product:create";
/// Permission to read products
pub const PRODUCT_READ: &str = "product:read";
/// Permission to update product stock
pub const PRODUCT_UPDATE: &str = "product:update";
/// Permission to delete products
pub const PRODUCT_DELETE: &str = "product:delete";

