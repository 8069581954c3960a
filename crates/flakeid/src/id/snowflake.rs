use core::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// A 64-bit Snowflake ID with split datacenter and worker fields.
///
/// - 42 bits timestamp (ms since the Unix epoch, truncated to 42 bits)
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             22 21             17 16         12 11             0
///              +----------------+-----------------+-------------+---------------+
///  Field:      | timestamp (42) | datacenter (5)  | worker (5)  | sequence (12) |
///              +----------------+-----------------+-------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ----------->|
/// ```
///
/// The timestamp is the absolute Unix millisecond reading, not an offset from
/// a custom epoch, so the field wraps 2^42 ms (about 139 years) after 1970.
///
/// # Example
///
/// ```
/// use flakeid::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1_700_000_000_000, 10, 5, 1);
/// assert_eq!(id.timestamp(), 1_700_000_000_000);
/// assert_eq!(id.datacenter_id(), 10);
/// assert_eq!(id.worker_id(), 5);
/// assert_eq!(id.sequence(), 1);
///
/// let parsed: SnowflakeId = id.to_string().parse().unwrap();
/// assert_eq!(parsed, id);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for extracting the 42-bit timestamp field. Occupies bits 22
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for extracting the 5-bit datacenter ID field. Occupies bits 17
    /// through 21.
    pub const DATACENTER_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for extracting the 5-bit worker ID field. Occupies bits 12
    /// through 16.
    pub const WORKER_ID_MASK: u64 = (1 << 5) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the datacenter ID to its correct position (bit
    /// 17).
    pub const DATACENTER_ID_SHIFT: u64 = 17;

    /// Number of bits to shift the worker ID to its correct position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the four fields into an ID.
    ///
    /// Every field is masked to its width before shifting, so oversized
    /// inputs are truncated rather than bleeding into neighbouring fields.
    pub const fn from_components(
        timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let datacenter_id = (datacenter_id & Self::DATACENTER_ID_MASK) << Self::DATACENTER_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | datacenter_id | worker_id | sequence,
        }
    }

    /// Wraps a raw 64-bit value. Every bit pattern is a valid ID.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw 64-bit value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the datacenter ID from the packed ID.
    pub const fn datacenter_id(&self) -> u64 {
        (self.id >> Self::DATACENTER_ID_SHIFT) & Self::DATACENTER_ID_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the largest value the sequence field can hold.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// All 64 bits carry a field, so any raw value decodes cleanly.
    pub const fn is_valid(&self) -> bool {
        true
    }

    /// Returns the ID as a zero-padded 20-digit string.
    ///
    /// Padded strings sort lexicographically in the same order as the
    /// numeric IDs.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }

    fn fields(&self) -> [FieldLayout; 4] {
        [
            FieldLayout {
                name: "timestamp",
                bits: 42,
                value: self.timestamp(),
            },
            FieldLayout {
                name: "datacenter_id",
                bits: 5,
                value: self.datacenter_id(),
            },
            FieldLayout {
                name: "worker_id",
                bits: 5,
                value: self.worker_id(),
            },
            FieldLayout {
                name: "sequence",
                bits: 12,
                value: self.sequence(),
            },
        ]
    }
}

impl From<u64> for SnowflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl FromStr for SnowflakeId {
    type Err = Error;

    /// Parses the canonical decimal representation.
    fn from_str(s: &str) -> Result<Self> {
        s.parse::<u64>()
            .map(Self::from_raw)
            .map_err(|_| Error::InvalidId {
                input: s.to_owned(),
            })
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

struct FieldLayout {
    name: &'static str,
    bits: u8,
    value: u64,
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:?}` stays on one line; `{:#?}` renders the bit layout table.
        if !f.alternate() {
            return f
                .debug_struct("SnowflakeId")
                .field("id", &self.id)
                .field("timestamp", &self.timestamp())
                .field("datacenter_id", &self.datacenter_id())
                .field("worker_id", &self.worker_id())
                .field("sequence", &self.sequence())
                .finish();
        }

        fn center(s: impl ToString, width: usize) -> String {
            let s = s.to_string();
            let len = s.len();
            if len >= width {
                return s;
            }
            let pad = width - len;
            let left = pad / 2;
            let right = pad - left;
            format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
        }

        fn border(f: &mut fmt::Formatter<'_>, columns: &[usize]) -> fmt::Result {
            write!(f, "        +")?;
            for &w in columns {
                write!(f, "{}+", "-".repeat(w))?;
            }
            writeln!(f)
        }

        let fields = self.fields();

        // Widest of label, decimal and hex per column, plus padding
        let columns: Vec<usize> = fields
            .iter()
            .map(|field| {
                let label_len = format!("{} ({})", field.name, field.bits).len();
                let dec_len = field.value.to_string().len();
                let hex_len = format!("0x{:x}", field.value).len();
                label_len.max(dec_len).max(hex_len) + 2
            })
            .collect();

        writeln!(f, "SnowflakeId {{")?;
        writeln!(f, "    raw id     : 0x{:016x} ({})", self.id, self.id)?;
        writeln!(f, "    padded     : {}", self.to_padded_string())?;
        writeln!(f, "    layout     :")?;

        border(f, &columns)?;
        write!(f, "        |")?;
        for (field, &w) in fields.iter().zip(&columns) {
            write!(f, "{}|", center(format!("{} ({})", field.name, field.bits), w))?;
        }
        writeln!(f)?;
        border(f, &columns)?;
        write!(f, "        |")?;
        for (field, &w) in fields.iter().zip(&columns) {
            write!(f, "{}|", center(field.value, w))?;
        }
        writeln!(f)?;
        write!(f, "        |")?;
        for (field, &w) in fields.iter().zip(&columns) {
            write!(f, "{}|", center(format!("0x{:x}", field.value), w))?;
        }
        writeln!(f)?;
        border(f, &columns)?;

        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_round_trip_through_raw() {
        let ts = 1_700_000_123_456;
        let id = SnowflakeId::from_components(ts, 31, 0, SnowflakeId::max_sequence());
        let decoded = SnowflakeId::from_raw(id.to_raw());

        assert_eq!(decoded.timestamp(), ts);
        assert_eq!(decoded.datacenter_id(), 31);
        assert_eq!(decoded.worker_id(), 0);
        assert_eq!(decoded.sequence(), 4095);
    }

    #[test]
    fn matches_reference_bit_layout() {
        let id = SnowflakeId::from_components(1, 1, 1, 1);
        assert_eq!(id.to_raw(), (1 << 22) | (1 << 17) | (1 << 12) | 1);
    }

    #[test]
    fn timestamp_is_truncated_to_42_bits() {
        let ts = (1 << 42) + 5;
        let id = SnowflakeId::from_components(ts, 0, 0, 0);
        assert_eq!(id.timestamp(), 5);
    }

    #[test]
    fn high_bit_does_not_sign_extend() {
        let ts = SnowflakeId::TIMESTAMP_MASK;
        let id = SnowflakeId::from_components(ts, 0, 0, 0);
        assert_eq!(id.to_raw() >> 63, 1);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.datacenter_id(), 0);
        assert_eq!(id.worker_id(), 0);
        assert_eq!(id.sequence(), 0);
        assert_eq!(id.to_string(), u64::MAX.wrapping_shl(22).to_string());
    }

    #[test]
    fn oversized_fields_do_not_bleed() {
        let id = SnowflakeId::from_components(0, 32, 33, 4096);
        assert_eq!(id.datacenter_id(), 0);
        assert_eq!(id.worker_id(), 1);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    fn parses_decimal_and_rejects_garbage() {
        let id: SnowflakeId = "18446744073709551615".parse().unwrap();
        assert_eq!(id.to_raw(), u64::MAX);
        assert!(id.is_valid());

        for bad in ["", "-1", "abc", "18446744073709551616", "12 34"] {
            assert_eq!(
                bad.parse::<SnowflakeId>(),
                Err(Error::InvalidId {
                    input: bad.to_owned()
                })
            );
        }
    }

    #[test]
    fn padded_string_sorts_like_numbers() {
        let small = SnowflakeId::from_raw(9);
        let large = SnowflakeId::from_raw(10);
        assert_eq!(small.to_padded_string(), "00000000000000000009");
        assert!(small.to_padded_string() < large.to_padded_string());
    }

    #[test]
    fn alternate_debug_renders_layout() {
        let id = SnowflakeId::from_components(42, 10, 5, 1);
        let rendered = format!("{id:#?}");
        assert!(rendered.starts_with("SnowflakeId {"));
        assert!(rendered.contains("datacenter_id (5)"));
        assert!(rendered.contains("0xa"));
        assert!(format!("{id:?}").contains("worker_id: 5"));
    }
}
