use std::sync::Arc;

use uuid::Uuid;

/// Source of identifiers for new activities and completions. Ids must never repeat within a
/// process lifetime, the store relies on them being unique.
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync + 'static {
    fn new_id(&self) -> Arc<str>;
}

/// The main realization of [IdGenerator], backed by random v4 UUIDs.
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> Arc<str> {
        Uuid::new_v4().to_string().into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{IdGenerator, UuidGenerator};

    #[test]
    fn uuid_generator_does_not_repeat() {
        let generator = UuidGenerator;
        let ids = (0..1000).map(|_| generator.new_id()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|v| v.len() == 36));
    }
}
