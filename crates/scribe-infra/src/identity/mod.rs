//! Identity provider implementations.

mod memory;

#[cfg(feature = "supabase")]
mod supabase;

pub use memory::StaticIdentityProvider;

#[cfg(feature = "supabase")]
pub use supabase::{SupabaseConfig, SupabaseIdentityProvider};
