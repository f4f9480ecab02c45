use smol_str::SmolStr;
use uuid::Uuid;

/// Random unique identifier, 32 lowercase hex characters.
pub fn random_id() -> SmolStr {
    SmolStr::new(Uuid::new_v4().simple().to_string())
}
