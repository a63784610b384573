/// A single raw byte as stored in a file.
pub type Byte = u8;

/// A finite, ordered run of bytes.
pub type Buffer = Vec<Byte>;

/// A byte offset relative to the editing session's start offset.
///
/// The whole public surface talks in session-relative positions; translating
/// to [`AbsoluteFilePosition`] is the file window's private concern.
pub type FilePosition = u64;

/// A byte offset into the underlying file itself.
pub type AbsoluteFilePosition = u64;
