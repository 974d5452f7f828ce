//! File-signature sniffing
//!
//! Classifies a byte prefix against known magic numbers so that an asset's
//! true format can be recovered when its extension lies.

/// One magic-number pattern; `None` matches any byte
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    /// Format labels reported when the pattern matches
    pub labels: &'static [&'static str],
    /// Positional byte constraints starting at offset 0
    pub bytes: &'static [Option<u8>],
}

impl Signature {
    /// Check the pattern against the start of `buffer`
    pub fn matches(&self, buffer: &[u8]) -> bool {
        buffer.len() >= self.bytes.len()
            && self
                .bytes
                .iter()
                .zip(buffer)
                .all(|(expected, actual)| expected.map_or(true, |b| b == *actual))
    }
}

static SIGNATURES: &[Signature] = &[
    Signature {
        labels: &["png"],
        bytes: &[Some(0x89), Some(0x50), Some(0x4E), Some(0x47)],
    },
    Signature {
        labels: &["jpg", "jpeg"],
        bytes: &[Some(0xFF), Some(0xD8), Some(0xFF)],
    },
    Signature {
        labels: &["bmp"],
        bytes: &[Some(0x42), Some(0x4D)],
    },
    Signature {
        labels: &["tif", "tiff"],
        bytes: &[Some(0x49), Some(0x49), Some(0x2A), Some(0x00)],
    },
    Signature {
        labels: &["tif", "tiff"],
        bytes: &[Some(0x4D), Some(0x4D), Some(0x00), Some(0x2A)],
    },
    Signature {
        labels: &["pdf"],
        bytes: &[Some(0x25), Some(0x50), Some(0x44), Some(0x46)],
    },
];

/// Magic-number classifier over a fixed signature table
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatSniffer;

impl FormatSniffer {
    /// Create a sniffer over the built-in signature table
    pub fn new() -> Self {
        Self
    }

    /// Number of leading bytes needed to test every signature
    pub fn prefix_len(&self) -> usize {
        SIGNATURES.iter().map(|s| s.bytes.len()).max().unwrap_or(0)
    }

    /// Inclusive end offset of the byte range to fetch
    pub fn range_end(&self) -> usize {
        self.prefix_len().saturating_sub(1)
    }

    /// Labels of every matching signature, in table order without repeats
    ///
    /// An empty result means "unknown" and is not an error.
    pub fn sniff(&self, buffer: &[u8]) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = Vec::new();
        for signature in SIGNATURES.iter().filter(|s| s.matches(buffer)) {
            for label in signature.labels {
                if !labels.contains(label) {
                    labels.push(label);
                }
            }
        }
        labels
    }
}
