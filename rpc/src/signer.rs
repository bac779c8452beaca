//! Local secp256k1 signing of EIP-155 legacy transactions.

use alloy_primitives::keccak256;
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rlp::RlpStream;

use ballot_types::{Address, PrivateKey, U256};

use crate::error::LedgerError;

/// An unsigned legacy (type 0) transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    /// `None` creates a contract.
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

/// Strip leading zero bytes: RLP integers are minimal big-endian.
fn trimmed(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

impl LegacyTransaction {
    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&trimmed(&self.nonce.to_be_bytes()));
        stream.append(&trimmed(&self.gas_price.to_be_bytes()));
        stream.append(&trimmed(&self.gas_limit.to_be_bytes()));
        match &self.to {
            Some(to) => stream.append(&to.as_bytes().as_slice()),
            None => stream.append_empty_data(),
        };
        stream.append(&trimmed(&self.value.to_be_bytes::<32>()));
        stream.append(&self.data.as_slice());
    }

    /// RLP payload hashed for signing: the body plus `(chain_id, 0, 0)`.
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&trimmed(&self.chain_id.to_be_bytes()));
        stream.append_empty_data();
        stream.append_empty_data();
        stream.out().to_vec()
    }

    pub fn signing_hash(&self) -> [u8; 32] {
        keccak256(self.signing_payload()).0
    }

    fn encode_signed(&self, v: u64, r: &[u8], s: &[u8]) -> Vec<u8> {
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&trimmed(&v.to_be_bytes()));
        stream.append(&trimmed(r));
        stream.append(&trimmed(s));
        stream.out().to_vec()
    }
}

/// Holds the signing key for one run. The key never leaves this struct.
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl LocalSigner {
    pub fn new(private_key: &PrivateKey) -> Result<Self, LedgerError> {
        let key = SigningKey::from_slice(private_key.as_bytes())
            .map_err(|_| LedgerError::Signing("private key is not a valid secp256k1 scalar".into()))?;
        let address = address_of(&key);
        Ok(Self { key, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign and return the raw transaction bytes for `eth_sendRawTransaction`.
    pub fn sign(&self, tx: &LegacyTransaction) -> Result<Vec<u8>, LedgerError> {
        let hash = tx.signing_hash();
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| LedgerError::Signing(e.to_string()))?;
        let v = u64::from(recovery_id.to_byte()) + tx.chain_id * 2 + 35;
        let rs = signature.to_bytes();
        Ok(tx.encode_signed(v, &rs[..32], &rs[32..]))
    }
}

/// Last 20 bytes of `keccak256` over the uncompressed public key.
fn address_of(key: &SigningKey) -> Address {
    let public = k256::PublicKey::from(key.verifying_key());
    let point = public.to_encoded_point(false);
    Address::from_word(&keccak256(&point.as_bytes()[1..]).0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

    fn eip155_example() -> LegacyTransaction {
        LegacyTransaction {
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: Some("0x3535353535353535353535353535353535353535".parse().unwrap()),
            value: U256::from(1_000_000_000_000_000_000u128),
            data: Vec::new(),
            chain_id: 1,
        }
    }

    #[test]
    fn eip155_signing_payload_and_hash() {
        let tx = eip155_example();
        assert_eq!(
            hex::encode(tx.signing_payload()),
            "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080"
        );
        assert_eq!(
            hex::encode(tx.signing_hash()),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn address_of_key_one() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let signer = LocalSigner::new(&PrivateKey::new(bytes)).unwrap();
        assert_eq!(
            signer.address().to_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn zero_key_is_rejected() {
        assert!(LocalSigner::new(&PrivateKey::new([0u8; 32])).is_err());
    }

    #[test]
    fn signature_recovers_to_signer() {
        let signer = LocalSigner::new(&PrivateKey::new([0x46; 32])).unwrap();
        let tx = eip155_example();
        let raw = signer.sign(&tx).unwrap();

        let rlp = rlp::Rlp::new(&raw);
        assert_eq!(rlp.item_count().unwrap(), 9);
        let v: u64 = rlp.val_at(6).unwrap();
        assert!(v == 37 || v == 38, "EIP-155 v for chain 1, got {v}");

        let mut rs = [0u8; 64];
        let r: Vec<u8> = rlp.val_at(7).unwrap();
        let s: Vec<u8> = rlp.val_at(8).unwrap();
        rs[32 - r.len()..32].copy_from_slice(&r);
        rs[64 - s.len()..].copy_from_slice(&s);

        let signature = Signature::from_slice(&rs).unwrap();
        let recovery_id = RecoveryId::from_byte((v - 37) as u8).unwrap();
        let recovered =
            VerifyingKey::recover_from_prehash(&tx.signing_hash(), &signature, recovery_id).unwrap();
        assert_eq!(&recovered, signer.key.verifying_key());
    }

    #[test]
    fn contract_creation_has_empty_to() {
        let mut tx = eip155_example();
        tx.to = None;
        let payload = tx.signing_payload();
        // the `to` slot encodes as the empty string 0x80 right after gas limit
        let gas_limit_end = payload
            .windows(3)
            .position(|w| w == [0x82, 0x52, 0x08])
            .unwrap()
            + 3;
        assert_eq!(payload[gas_limit_end], 0x80);
    }
}
