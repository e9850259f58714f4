use tokenshop::chain::{Call, Chain, CodecError, TransactionBuilder, TxCodec};
use tokenshop::identity::Keypair;
use tokenshop::shop::ExchangeConfig;

#[test]
fn test_offline_signed_transaction_executes_after_transport() {
    let owner = Keypair::generate();
    let alice = Keypair::generate();
    let mut chain = Chain::deploy(&owner, ExchangeConfig::default()).unwrap();
    chain.fund(&alice.address(), 25).unwrap();

    let signed = TransactionBuilder::new()
        .signer(&alice)
        .call(Call::PurchaseTokens { amount: 25 })
        .nonce(chain.nonce_of(&alice.address()))
        .value(25)
        .build()
        .unwrap();
    let encoded = TxCodec::encode_base64(&signed).unwrap();
    let decoded = TxCodec::decode_base64(&encoded).unwrap();
    assert_eq!(decoded, signed);

    let receipt = chain.execute(&decoded).unwrap();
    assert!(receipt.is_success());
    assert_eq!(chain.token().balance_of(&alice.address()), 5);
}

#[test]
fn test_hex_and_binary_forms_agree() {
    let keypair = Keypair::generate();
    let signed = TransactionBuilder::new()
        .signer(&keypair)
        .call(Call::PurchaseCollectible)
        .nonce(0)
        .build()
        .unwrap();

    let bytes = TxCodec::encode(&signed).unwrap();
    let hex_str = TxCodec::encode_hex(&signed).unwrap();

    assert_eq!(hex::encode(&bytes), hex_str);
    assert_eq!(TxCodec::decode_hex(&hex_str).unwrap(), signed);
}

#[test]
fn test_garbage_is_rejected() {
    assert!(matches!(
        TxCodec::decode_hex("not hex"),
        Err(CodecError::InvalidHex(_))
    ));
    assert!(TxCodec::decode(&[0xFF, 0x01, 0x02]).is_err());
    assert!(TxCodec::decode_base64("%%%").is_err());
}

#[test]
fn test_chain_state_round_trip() {
    let owner = Keypair::generate();
    let alice = Keypair::generate();
    let mut chain = Chain::deploy(&owner, ExchangeConfig::new(3, 2).unwrap()).unwrap();
    chain.fund(&alice.address(), 30).unwrap();
    chain
        .call_with_value(&alice, Call::PurchaseTokens { amount: 30 }, 30)
        .unwrap();

    let restored = Chain::from_bytes(&chain.to_bytes().unwrap()).unwrap();

    assert_eq!(restored.height(), chain.height());
    assert_eq!(restored.nonce_of(&alice.address()), 1);
    assert_eq!(restored.token().balance_of(&alice.address()), 10);
    assert_eq!(restored.sale().config(), chain.sale().config());
    assert!(restored.audit().is_ok());
}
