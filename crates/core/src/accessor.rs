//! Bounds-checked big-endian field reads over a header slice.

use std::net::Ipv4Addr;

use crate::DecodeError;

/// Reads fixed-offset fields out of a borrowed byte buffer.
///
/// Every read checks the requested span against the buffer length and
/// returns [`DecodeError::OutOfRange`] instead of panicking.
#[derive(Debug, Clone, Copy)]
pub struct ByteAccessor<'a> {
    data: &'a [u8],
}

impl<'a> ByteAccessor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn u8_at(&self, offset: usize) -> Result<u8, DecodeError> {
        let [b] = self.array_at::<1>(offset)?;
        Ok(b)
    }

    pub fn u32_at(&self, offset: usize) -> Result<u32, DecodeError> {
        self.array_at::<4>(offset).map(u32::from_be_bytes)
    }

    /// Four bytes as a dotted-quad address, each octet read unsigned.
    pub fn addr_at(&self, offset: usize) -> Result<Ipv4Addr, DecodeError> {
        self.array_at::<4>(offset).map(Ipv4Addr::from)
    }

    fn array_at<const N: usize>(&self, offset: usize) -> Result<[u8; N], DecodeError> {
        let out_of_range = DecodeError::OutOfRange {
            offset,
            len: N,
            available: self.data.len(),
        };
        let end = offset.checked_add(N).ok_or_else(|| out_of_range.clone())?;
        let span = self.data.get(offset..end).ok_or(out_of_range)?;
        let mut out = [0u8; N];
        out.copy_from_slice(span);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_reads() {
        let data = [0x01, 0x00, 0x00, 0x01, 0x2a, 0xff];
        let acc = ByteAccessor::new(&data);

        assert_eq!(acc.u8_at(0).unwrap(), 1);
        assert_eq!(acc.u8_at(5).unwrap(), 0xff);
        assert_eq!(acc.u32_at(0).unwrap(), 0x0100_0001);
        assert_eq!(acc.u32_at(2).unwrap(), 0x0001_2aff);
    }

    #[test]
    fn test_addr_uses_unsigned_octets() {
        let data = [192, 168, 200, 255];
        let acc = ByteAccessor::new(&data);
        assert_eq!(acc.addr_at(0).unwrap().to_string(), "192.168.200.255");
    }

    #[test]
    fn test_out_of_range() {
        let data = [0u8; 6];
        let acc = ByteAccessor::new(&data);

        assert_eq!(
            acc.u32_at(3),
            Err(DecodeError::OutOfRange { offset: 3, len: 4, available: 6 })
        );
        assert!(acc.u8_at(6).is_err());
        assert!(acc.addr_at(usize::MAX).is_err());
        assert!(ByteAccessor::new(&[]).u8_at(0).is_err());
    }
}
