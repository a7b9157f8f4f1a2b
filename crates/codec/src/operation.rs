// Path: crates/codec/src/operation.rs

//! Decoding of signed operation byte buffers.
//!
//! A buffer is a 32-byte branch reference followed by a sequence of tagged
//! items. The decoder is general over any number of items; the main-plus-
//! service-fee shape of user-facing operations is enforced by the engine's
//! validator, not here.
//!
//! Wire layout per item (leading tag byte):
//!   4  activation  — 40 opaque bytes, no transfer
//!   7  reveal      — header, curve byte, 32-byte public key, no transfer
//!   8  transaction — header, amount, destination, parameters flag
//!   9  origination — header, manager, balance, flags, optional delegate,
//!                    script flag
//!   10 delegation  — header, optional delegate, no transfer

use crate::cursor::ByteCursor;
use crate::prefixed;
use tessera_types::{AccountId, Amount, BlockHash, CodecError};

const TAG_ACTIVATION: u8 = 4;
const TAG_REVEAL: u8 = 7;
const TAG_TRANSACTION: u8 = 8;
const TAG_ORIGINATION: u8 = 9;
const TAG_DELEGATION: u8 = 10;

const ACTIVATION_CONTENT_LEN: usize = 40;
const PUBLIC_KEY_LEN: usize = 32;
const HASH_PAYLOAD_LEN: usize = 20;

/// What a decoded transfer record represents.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransferKind {
    /// Funds moved to an existing account.
    Transfer,
    /// Funds moved into a newly created account.
    Origination,
}

/// One monetary movement decoded from an operation item.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Transfer {
    /// Whether this is a plain transfer or an origination.
    pub kind: TransferKind,
    /// The debited identity or account.
    pub source: AccountId,
    /// The credited account; originations name no destination on the wire.
    pub destination: Option<AccountId>,
    /// The moved amount.
    pub amount: Amount,
    /// The network fee attached to this item.
    pub fee: Amount,
}

/// The decoded form of a signed operation buffer.
///
/// `transfers` preserves wire order: the first entry is the main operation,
/// subsequent entries are fee or service transfers. The decode consumes the
/// entire buffer; trailing bytes fail.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParsedOperation {
    /// The block the operation branches from.
    pub branch: BlockHash,
    /// Ordered transfer records, one per transaction/origination item.
    pub transfers: Vec<Transfer>,
    network_fees: Amount,
}

/// The per-item common header: source, fee, counter, gas and storage limits.
struct ItemHeader {
    source: AccountId,
    fee: Amount,
}

impl ParsedOperation {
    /// Decodes `bytes` into a branch hash and ordered transfer records.
    ///
    /// Fails if a tag byte is unrecognised, a declared-length read runs past
    /// the buffer end, an unsupported feature flag is set, or unconsumed
    /// bytes remain after the last item.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut cursor = ByteCursor::new(bytes);
        let branch = BlockHash::new(prefixed::encode(
            &prefixed::BLOCK_HASH,
            cursor.take(32)?,
        )?);

        let mut transfers = Vec::new();
        let mut network_fees = Amount::ZERO;

        while !cursor.is_empty() {
            match cursor.take_u8()? {
                TAG_ACTIVATION => {
                    // Activation content is not security-relevant here.
                    cursor.take(ACTIVATION_CONTENT_LEN)?;
                }
                TAG_REVEAL => {
                    let header = decode_header(&mut cursor)?;
                    let _curve = cursor.take_u8()?;
                    cursor.take(PUBLIC_KEY_LEN)?;
                    network_fees = network_fees.saturating_add(header.fee);
                }
                TAG_TRANSACTION => {
                    let header = decode_header(&mut cursor)?;
                    let amount = Amount::from_micro(cursor.take_varint()?);
                    let destination = decode_reference(&mut cursor)?;
                    if cursor.take_bool()? {
                        return Err(CodecError::Unsupported("transaction parameters"));
                    }
                    network_fees = network_fees.saturating_add(header.fee);
                    transfers.push(Transfer {
                        kind: TransferKind::Transfer,
                        source: header.source,
                        destination: Some(destination),
                        amount,
                        fee: header.fee,
                    });
                }
                TAG_ORIGINATION => {
                    let header = decode_header(&mut cursor)?;
                    let _manager = decode_identity(&mut cursor)?;
                    let balance = Amount::from_micro(cursor.take_varint()?);
                    let _spendable = cursor.take_bool()?;
                    let _delegatable = cursor.take_bool()?;
                    if cursor.take_bool()? {
                        decode_identity(&mut cursor)?;
                    }
                    if cursor.take_bool()? {
                        return Err(CodecError::Unsupported("origination script"));
                    }
                    network_fees = network_fees.saturating_add(header.fee);
                    transfers.push(Transfer {
                        kind: TransferKind::Origination,
                        source: header.source,
                        destination: None,
                        amount: balance,
                        fee: header.fee,
                    });
                }
                TAG_DELEGATION => {
                    let header = decode_header(&mut cursor)?;
                    if cursor.take_bool()? {
                        decode_identity(&mut cursor)?;
                    }
                    network_fees = network_fees.saturating_add(header.fee);
                }
                tag => return Err(CodecError::UnknownTag(tag)),
            }
        }

        debug_assert!(cursor.is_empty());
        Ok(Self {
            branch,
            transfers,
            network_fees,
        })
    }

    /// The sum of all per-item fees, including items that record no
    /// transfer (reveals, delegations).
    pub fn network_fees(&self) -> Amount {
        self.network_fees
    }
}

fn decode_header(cursor: &mut ByteCursor<'_>) -> Result<ItemHeader, CodecError> {
    let source = decode_reference(cursor)?;
    let fee = Amount::from_micro(cursor.take_varint()?);
    let _counter = cursor.take_varint()?;
    let _gas_limit = cursor.take_varint()?;
    let _storage_limit = cursor.take_varint()?;
    Ok(ItemHeader { source, fee })
}

/// An account-or-identity reference: a selector byte, then either an
/// identity hash (family selector + 20 bytes) or a contract hash (20 bytes
/// + 1 padding byte).
fn decode_reference(cursor: &mut ByteCursor<'_>) -> Result<AccountId, CodecError> {
    match cursor.take_u8()? {
        0 => decode_identity(cursor),
        1 => {
            let hash = cursor.take(HASH_PAYLOAD_LEN)?;
            let address = prefixed::encode(&prefixed::CONTRACT_HASH, hash)?;
            let _padding = cursor.take_u8()?;
            Ok(AccountId::new(address))
        }
        selector => Err(CodecError::UnknownReferenceSelector(selector)),
    }
}

/// An identity hash: one hash-family selector byte, then 20 payload bytes.
fn decode_identity(cursor: &mut ByteCursor<'_>) -> Result<AccountId, CodecError> {
    let family = cursor.take_u8()?;
    let prefix = prefixed::IDENTITY_HASH_FAMILIES
        .get(usize::from(family))
        .ok_or(CodecError::UnknownHashFamily(family))?;
    let hash = cursor.take(HASH_PAYLOAD_LEN)?;
    Ok(AccountId::new(prefixed::encode(prefix, hash)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Hand-built wire buffers; the encoder in the sim crate is deliberately
    // not used here so the decoder is tested against independent bytes.

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

    fn push_identity(buf: &mut Vec<u8>, family: u8, hash: [u8; 20]) {
        buf.push(family);
        buf.extend_from_slice(&hash);
    }

    fn push_identity_reference(buf: &mut Vec<u8>, family: u8, hash: [u8; 20]) {
        buf.push(0);
        push_identity(buf, family, hash);
    }

    fn push_contract_reference(buf: &mut Vec<u8>, hash: [u8; 20]) {
        buf.push(1);
        buf.extend_from_slice(&hash);
        buf.push(0); // padding
    }

    fn push_header(buf: &mut Vec<u8>, source_hash: [u8; 20], fee: u64) {
        push_identity_reference(buf, 0, source_hash);
        push_varint(buf, fee); // fee
        push_varint(buf, 1); // counter
        push_varint(buf, 10_100); // gas limit
        push_varint(buf, 257); // storage limit
    }

    fn push_transaction(
        buf: &mut Vec<u8>,
        source_hash: [u8; 20],
        fee: u64,
        amount: u64,
        dest_hash: [u8; 20],
    ) {
        buf.push(8);
        push_header(buf, source_hash, fee);
        push_varint(buf, amount);
        push_contract_reference(buf, dest_hash);
        buf.push(0); // no parameters
    }

    fn branch_bytes() -> Vec<u8> {
        vec![0x11; 32]
    }

    const SOURCE: [u8; 20] = [1; 20];
    const DEST: [u8; 20] = [2; 20];
    const SERVICE: [u8; 20] = [3; 20];

    #[test]
    fn transaction_with_service_fee_decodes_two_transfers() {
        let mut buf = branch_bytes();
        push_transaction(&mut buf, SOURCE, 1_400, 2_000_000, DEST);
        push_transaction(&mut buf, SOURCE, 0, 100_000, SERVICE);

        let parsed = ParsedOperation::decode(&buf).unwrap();
        assert_eq!(parsed.transfers.len(), 2);

        let main = &parsed.transfers[0];
        assert_eq!(main.kind, TransferKind::Transfer);
        assert_eq!(
            main.source,
            AccountId::new(
                prefixed::encode(&prefixed::ED25519_PUBLIC_KEY_HASH, &SOURCE).unwrap()
            )
        );
        assert_eq!(
            main.destination,
            Some(AccountId::new(
                prefixed::encode(&prefixed::CONTRACT_HASH, &DEST).unwrap()
            ))
        );
        assert_eq!(main.amount, Amount::from_micro(2_000_000));
        assert_eq!(main.fee, Amount::from_micro(1_400));

        let service = &parsed.transfers[1];
        assert_eq!(service.amount, Amount::from_micro(100_000));
        assert_eq!(service.fee, Amount::ZERO);

        // Network fees are the sum of per-item fees.
        assert_eq!(parsed.network_fees(), Amount::from_micro(1_400));
    }

    #[test]
    fn branch_is_prefixed_block_hash() {
        let mut buf = branch_bytes();
        push_transaction(&mut buf, SOURCE, 0, 1, DEST);
        let parsed = ParsedOperation::decode(&buf).unwrap();
        assert!(parsed.branch.as_str().starts_with('B'));
    }

    #[test]
    fn trailing_bytes_fail() {
        let mut buf = branch_bytes();
        push_transaction(&mut buf, SOURCE, 1_400, 2_000_000, DEST);
        buf.push(0x63); // garbage after a complete operation
        let err = ParsedOperation::decode(&buf).unwrap_err();
        // The stray byte is read as a tag and rejected.
        assert_eq!(err, CodecError::UnknownTag(0x63));
    }

    #[test]
    fn unknown_tag_fails() {
        let mut buf = branch_bytes();
        buf.push(11);
        assert_eq!(
            ParsedOperation::decode(&buf).unwrap_err(),
            CodecError::UnknownTag(11)
        );
    }

    #[test]
    fn truncated_buffer_fails() {
        let mut buf = branch_bytes();
        push_transaction(&mut buf, SOURCE, 1_400, 2_000_000, DEST);
        buf.truncate(buf.len() - 5);
        assert!(matches!(
            ParsedOperation::decode(&buf).unwrap_err(),
            CodecError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn transaction_parameters_are_rejected() {
        let mut buf = branch_bytes();
        buf.push(8);
        push_header(&mut buf, SOURCE, 1_400);
        push_varint(&mut buf, 5);
        push_contract_reference(&mut buf, DEST);
        buf.push(255); // parameters present
        assert_eq!(
            ParsedOperation::decode(&buf).unwrap_err(),
            CodecError::Unsupported("transaction parameters")
        );
    }

    #[test]
    fn origination_decodes_balance_and_optional_delegate() {
        let mut buf = branch_bytes();
        buf.push(9);
        push_header(&mut buf, SOURCE, 2_000);
        push_identity(&mut buf, 0, SOURCE); // manager
        push_varint(&mut buf, 5_000_000); // balance
        buf.push(255); // spendable
        buf.push(0); // not delegatable
        buf.push(255); // delegate present
        push_identity(&mut buf, 2, DEST); // delegate, p256 family
        buf.push(0); // no script

        let parsed = ParsedOperation::decode(&buf).unwrap();
        assert_eq!(parsed.transfers.len(), 1);
        let origination = &parsed.transfers[0];
        assert_eq!(origination.kind, TransferKind::Origination);
        assert_eq!(origination.amount, Amount::from_micro(5_000_000));
        assert_eq!(origination.destination, None);
        assert_eq!(parsed.network_fees(), Amount::from_micro(2_000));
    }

    #[test]
    fn origination_script_is_rejected() {
        let mut buf = branch_bytes();
        buf.push(9);
        push_header(&mut buf, SOURCE, 2_000);
        push_identity(&mut buf, 0, SOURCE);
        push_varint(&mut buf, 5_000_000);
        buf.push(0); // not spendable
        buf.push(0); // not delegatable
        buf.push(0); // no delegate
        buf.push(255); // script present
        assert_eq!(
            ParsedOperation::decode(&buf).unwrap_err(),
            CodecError::Unsupported("origination script")
        );
    }

    #[test]
    fn reveal_and_delegation_record_no_transfer_but_count_fees() {
        let mut buf = branch_bytes();
        // Reveal
        buf.push(7);
        push_header(&mut buf, SOURCE, 1_269);
        buf.push(0); // curve discriminator
        buf.extend_from_slice(&[9u8; 32]); // public key
        // Delegation with delegate
        buf.push(10);
        push_header(&mut buf, SOURCE, 1_000);
        buf.push(255);
        push_identity(&mut buf, 1, DEST);

        let parsed = ParsedOperation::decode(&buf).unwrap();
        assert!(parsed.transfers.is_empty());
        assert_eq!(parsed.network_fees(), Amount::from_micro(2_269));
    }

    #[test]
    fn activation_skips_opaque_content() {
        let mut buf = branch_bytes();
        buf.push(4);
        buf.extend_from_slice(&[0xaa; 40]);
        let parsed = ParsedOperation::decode(&buf).unwrap();
        assert!(parsed.transfers.is_empty());
        assert_eq!(parsed.network_fees(), Amount::ZERO);
    }

    #[test]
    fn unknown_hash_family_fails() {
        let mut buf = branch_bytes();
        buf.push(8);
        buf.push(0); // identity reference
        buf.push(9); // bogus family
        buf.extend_from_slice(&[0u8; 20]);
        assert_eq!(
            ParsedOperation::decode(&buf).unwrap_err(),
            CodecError::UnknownHashFamily(9)
        );
    }

    #[test]
    fn unknown_reference_selector_fails() {
        let mut buf = branch_bytes();
        buf.push(8);
        buf.push(7); // bogus selector
        assert_eq!(
            ParsedOperation::decode(&buf).unwrap_err(),
            CodecError::UnknownReferenceSelector(7)
        );
    }
}
