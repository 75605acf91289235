#![cfg(feature = "serde")]
#![allow(missing_docs)]

use contok::{
    coders::{HierarchicalLZCoder, HierarchicalLZCoderOptions, LZCoder, LZCoderOptions},
    tokenizers::{BytePairEncoderOptions, ContextualEncoder, Tokenizer},
    types::symbols_from_str,
};

type T = u32;

fn reload<V>(value: &V) -> V
where
    V: serde::Serialize + serde::de::DeserializeOwned,
{
    let json = serde_json::to_string(value).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_lz_reload() {
    let mut coder: LZCoder<T> = LZCoderOptions::new(Some(512))
        .with_input_vocab(0..128)
        .init()
        .unwrap();
    coder
        .encode(&symbols_from_str("peter piper picked a peck"), true)
        .unwrap();

    let mut reloaded = reload(&coder);
    assert_eq!(reloaded, coder);

    let text: Vec<T> = symbols_from_str("of pickled peppers");
    assert_eq!(
        reloaded.encode(&text, true).unwrap(),
        coder.encode(&text, true).unwrap()
    );
    assert_eq!(reloaded, coder);
}

#[test]
fn test_hierarchical_reload() {
    let mut coder: HierarchicalLZCoder<T> = HierarchicalLZCoderOptions::new(Some(512))
        .with_input_vocab(0..128)
        .init()
        .unwrap();
    let first: Vec<T> = symbols_from_str("how much wood would a woodchuck chuck");
    let ids = coder.encode(&first, true).unwrap();

    let mut reloaded = reload(&coder);
    assert_eq!(reloaded, coder);
    assert_eq!(reloaded.decode(&ids).unwrap(), first);

    let second: Vec<T> = symbols_from_str("if a woodchuck could chuck wood");
    assert_eq!(
        reloaded.encode(&second, true).unwrap(),
        coder.encode(&second, true).unwrap()
    );
    assert_eq!(reloaded, coder);
}

#[test]
fn test_contextual_reload() {
    let sample: Vec<T> = symbols_from_str("she sells sea shells");
    let mut encoder = ContextualEncoder::<T>::new();
    let learned = encoder.learn(&sample, None).unwrap();

    let reloaded = reload(&encoder);
    assert_eq!(reloaded.try_decode(&learned).unwrap(), sample);
    assert_eq!(reloaded.try_encode(&sample).unwrap(), learned);
}

#[test]
fn test_bpe_reload() {
    let sample: Vec<T> = symbols_from_str("aaabdaaabac");
    let mut encoder = BytePairEncoderOptions::default()
        .with_max_merges(8)
        .init::<T>()
        .unwrap();
    let learned = encoder.learn(&sample, None).unwrap();

    let reloaded = reload(&encoder);
    assert_eq!(reloaded.merges(), encoder.merges());
    assert_eq!(reloaded.options(), encoder.options());
    assert_eq!(reloaded.try_encode(&sample).unwrap(), learned);
    assert_eq!(reloaded.try_decode(&learned).unwrap(), sample);

    let other: Vec<T> = symbols_from_str("dabacabad");
    assert_eq!(
        reloaded.try_encode(&other).unwrap(),
        encoder.try_encode(&other).unwrap()
    );
}
