//! # IDs
//! Shapes and gradient stops each carry an identifier, implemented in this module via the `Id<T>` type,
//! which wraps a UUID namespaced by the type T.
//!
//! IDs are never conjured from thin air. They are requested from an [`IdSource`] owned by whoever is performing
//! the mutation, so two editors never share generator state and tests can use [`SequentialIds`] for
//! reproducible results.

/// Anything that can hand out fresh, unique identifiers.
pub trait IdSource {
    /// Produce an identifier that this source has never produced before.
    fn next_uuid(&mut self) -> uuid::Uuid;
}
impl<Source: IdSource + ?Sized> IdSource for &mut Source {
    fn next_uuid(&mut self) -> uuid::Uuid {
        (**self).next_uuid()
    }
}

/// Random (v4) UUIDs. The default for real editors.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;
impl IdSource for RandomIds {
    fn next_uuid(&mut self) -> uuid::Uuid {
        uuid::Uuid::new_v4()
    }
}

/// Counts upwards from one. Deterministic, so identical sequences of operations produce identical IDs.
#[derive(Clone, Debug, Default)]
pub struct SequentialIds {
    next: u128,
}
impl SequentialIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
impl IdSource for SequentialIds {
    fn next_uuid(&mut self) -> uuid::Uuid {
        // Zero is the nil UUID, skip it.
        self.next += 1;
        uuid::Uuid::from_u128(self.next)
    }
}

/// ID that is unique within its namespace `T`.
/// IDs with different types may share a value but should not be considered equal.
pub struct Id<T: std::any::Any> {
    id: uuid::Uuid,
    // Namespace marker
    _phantom: std::marker::PhantomData<T>,
}
impl<T: std::any::Any> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for Id<T> {}
impl<T: std::any::Any> std::cmp::PartialEq<Id<T>> for Id<T> {
    fn eq(&self, other: &Id<T>) -> bool {
        // Namespace already checked at compile time - Self::T == Other::T of course!
        self.id == other.id
    }
}
impl<T: std::any::Any> std::cmp::Eq for Id<T> {}

// Safety - it's just a UUID.
// We need these because if T is !Send or !Sync that is carried
// over to the ID, even though we don't actually store a T and thus
// shouldn't be bound by this.
unsafe impl<T: std::any::Any> Send for Id<T> {}
unsafe impl<T: std::any::Any> Sync for Id<T> {}

impl<T: std::any::Any> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: std::any::Any> Id<T> {
    /// Wrap an existing UUID, e.g. one read back from a project file.
    #[must_use]
    pub fn from_uuid(id: uuid::Uuid) -> Self {
        Self {
            id,
            _phantom: std::marker::PhantomData,
        }
    }
    /// Draw a fresh ID from the given source.
    pub fn generate(source: &mut impl IdSource) -> Self {
        Self::from_uuid(source.next_uuid())
    }
    /// Get the raw UUID of this ID.
    /// IDs from differing namespaces may share the same UUID!
    #[must_use]
    pub fn uuid(&self) -> uuid::Uuid {
        self.id
    }
}
impl<T: std::any::Any> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        //Unwrap here is safe - the rsplit will always return at least one element, even for empty strings.
        write!(
            f,
            "{}#{}",
            std::any::type_name::<T>().rsplit("::").next().unwrap(),
            self.id
        )
    }
}
impl<T: std::any::Any> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Id<T> as std::fmt::Display>::fmt(self, f)
    }
}

// Serialized as the bare UUID. The namespace is implied by where the ID is stored.
impl<T: std::any::Any> serde::Serialize for Id<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}
impl<'de, T: std::any::Any> serde::Deserialize<'de> for Id<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        uuid::Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}

#[cfg(test)]
mod test {
    use super::{Id, IdSource, RandomIds, SequentialIds};

    struct Namespace;
    type TestID = Id<Namespace>;

    #[test]
    fn sequential_is_deterministic() {
        let mut a = SequentialIds::new();
        let mut b = SequentialIds::new();
        let from_a: Vec<_> = (0..16).map(|_| TestID::generate(&mut a)).collect();
        let from_b: Vec<_> = (0..16).map(|_| TestID::generate(&mut b)).collect();
        assert_eq!(from_a, from_b);
        // Never hands out the nil UUID.
        assert!(from_a.iter().all(|id| !id.uuid().is_nil()));
    }
    #[test]
    fn many_ids_unique() {
        let mut source = RandomIds;
        let mut v: Vec<_> = (0..1024).map(|_| source.next_uuid()).collect();

        v.sort_unstable();
        let length_before = v.len();
        v.dedup();
        assert_eq!(length_before, v.len(), "had duplicate ids");
    }
    #[test]
    fn display_names_namespace() {
        let id = TestID::generate(&mut SequentialIds::new());
        assert!(id.to_string().starts_with("Namespace#"));
    }
}
