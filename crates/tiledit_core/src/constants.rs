//! Shared constants used across tiledit crates.

/// Default number of spaces a tab stop spans.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Chunk size used by cancellable searches.
pub const DEFAULT_SEARCH_CHUNK_SIZE: usize = 32 * 1024;

/// Maximum distance scanned when looking for a newline around an offset.
pub const DEFAULT_NEWLINE_SCAN_MAX: usize = 2500;

/// Neighborhood read around the cursor when caching the highlighted word.
pub const DEFAULT_WORD_HIGHLIGHT_LOOKUP: usize = 250;

/// Window searched on each side of the cursor for a matching bracket.
pub const DEFAULT_PARENTHESIS_WINDOW: usize = 5000;

/// Window scanned before the visible range by the syntax highlighter.
pub const DEFAULT_SYNTAX_WINDOW: usize = 5000;

/// How long a clipboard read may take before it is abandoned.
pub const DEFAULT_CLIPBOARD_TIMEOUT_MS: u64 = 1000;

/// Default wrap-line indicator glyph.
pub const DEFAULT_WRAP_INDICATOR: char = '\u{2190}';

/// Minimum column (in spaces) where annotations start.
pub const DEFAULT_ANNOTATION_MIN_COLUMNS: usize = 20;

/// Undo log limits.
pub const DEFAULT_UNDO_MAX_GROUPS: usize = 1000;
/// Upper bound on bytes retained by the undo log.
pub const DEFAULT_UNDO_MAX_BYTES: usize = 8 * 1024 * 1024;
/// Window in which consecutive typing is merged into one undo group.
pub const DEFAULT_UNDO_COALESCE_MS: u64 = 750;

/// Buffers shrink their storage once capacity exceeds this multiple of length.
pub const SHRINK_CAPACITY_FACTOR: usize = 3;
/// Buffers smaller than this never shrink.
pub const SHRINK_MIN_LEN: usize = 1024;
