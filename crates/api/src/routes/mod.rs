//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Brands
//! GET    /api/marcas                          - List brands
//! GET    /api/marcas/{id}                     - Get brand
//! POST   /api/marcas                          - Create brand (admin)
//! PUT    /api/marcas/{id}                     - Update brand (admin)
//! DELETE /api/marcas/{id}                     - Delete brand (admin)
//!
//! # Sizes
//! GET    /api/talles                          - List sizes
//! GET    /api/talles/{id}                     - Get size
//! POST   /api/talles                          - Create size (admin)
//! PUT    /api/talles/{id}                     - Update size (admin)
//! DELETE /api/talles/{id}                     - Delete size (admin)
//!
//! # Colors
//! GET    /api/colores                         - List colors
//! GET    /api/colores/{id}                    - Get color
//! POST   /api/colores                         - Create color (admin)
//! PUT    /api/colores/{id}                    - Update color (admin)
//! DELETE /api/colores/{id}                    - Delete color (admin)
//!
//! # Garments
//! GET    /api/prendas                         - List garments
//! GET    /api/prendas/{id}                    - Get garment
//! POST   /api/prendas                         - Create garment (admin)
//! PUT    /api/prendas/{id}                    - Update garment (admin)
//! DELETE /api/prendas/{id}                    - Delete garment (admin)
//!
//! # Stock
//! GET    /api/stocks                          - List stock entries
//! GET    /api/stocks/product/{id}             - List stock of one garment
//! POST   /api/stocks/check-availability       - Availability check
//! POST   /api/stocks                          - Create stock entry (admin)
//! PUT    /api/stocks/{id}                     - Update stock entry (admin)
//! PUT    /api/stocks/{id}/availability        - Toggle availability (admin)
//! DELETE /api/stocks/{id}                     - Delete stock entry (admin)
//!
//! # Carts (all require auth)
//! GET    /api/carritos/user/{usuario_id}      - Get-or-create the user's cart
//! GET    /api/carritos/{id}                   - Get cart with items
//! DELETE /api/carritos/{id}                   - Delete cart
//! POST   /api/carritos/item                   - Add item
//! PUT    /api/carritos/item                   - Set item quantity
//! DELETE /api/carritos/{carrito_id}/item/{stock_id} - Remove item
//! POST   /api/carritos/{carrito_id}/checkout  - Checkout
//!
//! # Users
//! POST   /api/users                           - Register
//! POST   /api/users/login                     - Login
//! POST   /api/users/validate-token            - Validate a bearer token
//! POST   /api/users/logout/{id}               - Logout (auth)
//! GET    /api/users                           - List users (admin)
//! GET    /api/users/{id}                      - Get user (self or admin)
//! PUT    /api/users/{id}                      - Update user (self or admin)
//! DELETE /api/users/{id}                      - Delete user (self or admin)
//! ```

pub mod brands;
pub mod carts;
pub mod colors;
pub mod garments;
pub mod sizes;
pub mod stock;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(brands::router())
        .merge(sizes::router())
        .merge(colors::router())
        .merge(garments::router())
        .merge(stock::router())
        .merge(carts::router())
        .merge(users::router())
}
