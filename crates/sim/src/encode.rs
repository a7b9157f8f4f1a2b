// Path: crates/sim/src/encode.rs

//! Wire-format encoding of operation buffers.
//!
//! The inverse of the codec crate's decoder, used by the simulated backend
//! to hand out prepare results that decode and validate like real node
//! output. Counters are assigned sequentially per buffer; gas and storage
//! limits are fixed placeholders the decoder skips over.

use tessera_codec::prefixed;
use tessera_types::{AccountId, Amount, CodecError};

const TAG_ACTIVATION: u8 = 4;
const TAG_REVEAL: u8 = 7;
const TAG_TRANSACTION: u8 = 8;
const TAG_ORIGINATION: u8 = 9;
const TAG_DELEGATION: u8 = 10;

const GAS_LIMIT: u64 = 10_100;
const STORAGE_LIMIT: u64 = 257;

/// Builds an operation byte buffer item by item.
pub struct OperationBuilder {
    buf: Vec<u8>,
    counter: u64,
}

impl OperationBuilder {
    /// Starts a buffer branching from the given 32-byte block hash.
    pub fn new(branch: [u8; 32]) -> Self {
        Self {
            buf: branch.to_vec(),
            counter: 1,
        }
    }

    /// Appends a transaction item.
    pub fn transaction(
        mut self,
        source: &AccountId,
        destination: &AccountId,
        amount: Amount,
        fee: Amount,
    ) -> Result<Self, CodecError> {
        self.buf.push(TAG_TRANSACTION);
        self.push_header(source, fee)?;
        push_varint(&mut self.buf, amount.as_micro());
        push_reference(&mut self.buf, destination)?;
        self.buf.push(0); // no parameters
        Ok(self)
    }

    /// Appends an origination item moving `balance` into the new account.
    pub fn origination(
        mut self,
        source: &AccountId,
        balance: Amount,
        fee: Amount,
        delegate: Option<&AccountId>,
    ) -> Result<Self, CodecError> {
        self.buf.push(TAG_ORIGINATION);
        self.push_header(source, fee)?;
        push_identity(&mut self.buf, source)?; // manager
        push_varint(&mut self.buf, balance.as_micro());
        self.buf.push(255); // spendable
        self.buf.push(0); // not delegatable
        match delegate {
            Some(delegate) => {
                self.buf.push(255);
                push_identity(&mut self.buf, delegate)?;
            }
            None => self.buf.push(0),
        }
        self.buf.push(0); // no script
        Ok(self)
    }

    /// Appends a public-key reveal item.
    pub fn reveal(
        mut self,
        source: &AccountId,
        fee: Amount,
        public_key: &[u8; 32],
    ) -> Result<Self, CodecError> {
        self.buf.push(TAG_REVEAL);
        self.push_header(source, fee)?;
        self.buf.push(0); // ed25519 curve
        self.buf.extend_from_slice(public_key);
        Ok(self)
    }

    /// Appends a delegation item.
    pub fn delegation(
        mut self,
        source: &AccountId,
        fee: Amount,
        delegate: Option<&AccountId>,
    ) -> Result<Self, CodecError> {
        self.buf.push(TAG_DELEGATION);
        self.push_header(source, fee)?;
        match delegate {
            Some(delegate) => {
                self.buf.push(255);
                push_identity(&mut self.buf, delegate)?;
            }
            None => self.buf.push(0),
        }
        Ok(self)
    }

    /// Appends an activation item with opaque content.
    pub fn activation(mut self, content: &[u8; 40]) -> Self {
        self.buf.push(TAG_ACTIVATION);
        self.buf.extend_from_slice(content);
        self
    }

    /// The finished buffer.
    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    fn push_header(&mut self, source: &AccountId, fee: Amount) -> Result<(), CodecError> {
        push_reference(&mut self.buf, source)?;
        push_varint(&mut self.buf, fee.as_micro());
        push_varint(&mut self.buf, self.counter);
        self.counter += 1;
        push_varint(&mut self.buf, GAS_LIMIT);
        push_varint(&mut self.buf, STORAGE_LIMIT);
        Ok(())
    }
}

fn push_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// An identity hash with its wire family selector.
fn identity_family(id: &AccountId) -> Result<(u8, Vec<u8>), CodecError> {
    for (family, prefix) in prefixed::IDENTITY_HASH_FAMILIES.iter().enumerate() {
        if let Ok(hash) = prefixed::decode(prefix, id.as_str()) {
            return Ok((family as u8, hash));
        }
    }
    Err(CodecError::PrefixMismatch("identity hash"))
}

fn push_identity(buf: &mut Vec<u8>, id: &AccountId) -> Result<(), CodecError> {
    let (family, hash) = identity_family(id)?;
    buf.push(family);
    buf.extend_from_slice(&hash);
    Ok(())
}

/// An account-or-identity reference, selector byte included.
fn push_reference(buf: &mut Vec<u8>, id: &AccountId) -> Result<(), CodecError> {
    if let Ok((family, hash)) = identity_family(id) {
        buf.push(0);
        buf.push(family);
        buf.extend_from_slice(&hash);
        return Ok(());
    }
    let hash = prefixed::decode(&prefixed::CONTRACT_HASH, id.as_str())?;
    buf.push(1);
    buf.extend_from_slice(&hash);
    buf.push(0); // padding
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_codec::{ParsedOperation, TransferKind};

    fn identity(hash: [u8; 20]) -> AccountId {
        AccountId::new(prefixed::encode(&prefixed::ED25519_PUBLIC_KEY_HASH, &hash).unwrap())
    }

    fn contract(hash: [u8; 20]) -> AccountId {
        AccountId::new(prefixed::encode(&prefixed::CONTRACT_HASH, &hash).unwrap())
    }

    #[test]
    fn built_transaction_decodes_back() {
        let source = identity([1; 20]);
        let dest = contract([2; 20]);
        let bytes = OperationBuilder::new([0x11; 32])
            .transaction(&source, &dest, Amount::from_micro(2_000_000), Amount::from_micro(1_400))
            .unwrap()
            .build();

        let parsed = ParsedOperation::decode(&bytes).unwrap();
        assert_eq!(parsed.transfers.len(), 1);
        let t = &parsed.transfers[0];
        assert_eq!(t.kind, TransferKind::Transfer);
        assert_eq!(t.source, source);
        assert_eq!(t.destination, Some(dest));
        assert_eq!(t.amount, Amount::from_micro(2_000_000));
        assert_eq!(parsed.network_fees(), Amount::from_micro(1_400));
    }

    #[test]
    fn built_origination_decodes_back() {
        let source = identity([1; 20]);
        let delegate = identity([4; 20]);
        let bytes = OperationBuilder::new([0x11; 32])
            .origination(
                &source,
                Amount::from_micro(5_000_000),
                Amount::from_micro(2_000),
                Some(&delegate),
            )
            .unwrap()
            .build();

        let parsed = ParsedOperation::decode(&bytes).unwrap();
        assert_eq!(parsed.transfers.len(), 1);
        assert_eq!(parsed.transfers[0].kind, TransferKind::Origination);
        assert_eq!(parsed.transfers[0].amount, Amount::from_micro(5_000_000));
        assert_eq!(parsed.transfers[0].destination, None);
    }

    #[test]
    fn reveal_then_transaction_counts_both_fees() {
        let source = identity([1; 20]);
        let dest = contract([2; 20]);
        let bytes = OperationBuilder::new([0x11; 32])
            .reveal(&source, Amount::from_micro(1_269), &[9; 32])
            .unwrap()
            .transaction(&source, &dest, Amount::from_micro(1), Amount::from_micro(1_400))
            .unwrap()
            .build();

        let parsed = ParsedOperation::decode(&bytes).unwrap();
        assert_eq!(parsed.transfers.len(), 1);
        assert_eq!(parsed.network_fees(), Amount::from_micro(2_669));
    }

    #[test]
    fn delegation_round_trips_fee_without_transfer() {
        let source = identity([1; 20]);
        let delegate = identity([5; 20]);
        let bytes = OperationBuilder::new([0x11; 32])
            .delegation(&source, Amount::from_micro(1_000), Some(&delegate))
            .unwrap()
            .delegation(&source, Amount::from_micro(500), None)
            .unwrap()
            .build();

        let parsed = ParsedOperation::decode(&bytes).unwrap();
        assert!(parsed.transfers.is_empty());
        assert_eq!(parsed.network_fees(), Amount::from_micro(1_500));
    }

    #[test]
    fn activation_round_trips() {
        let bytes = OperationBuilder::new([0x11; 32]).activation(&[0xaa; 40]).build();
        let parsed = ParsedOperation::decode(&bytes).unwrap();
        assert!(parsed.transfers.is_empty());
    }

    #[test]
    fn contract_source_round_trips() {
        let source = contract([7; 20]);
        let dest = identity([8; 20]);
        let bytes = OperationBuilder::new([0x11; 32])
            .transaction(&source, &dest, Amount::from_micro(10), Amount::ZERO)
            .unwrap()
            .build();
        let parsed = ParsedOperation::decode(&bytes).unwrap();
        assert_eq!(parsed.transfers[0].source, source);
        assert_eq!(parsed.transfers[0].destination, Some(dest));
    }
}
