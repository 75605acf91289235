#![allow(missing_docs)]

use std::sync::LazyLock;

use contok::{
    coders::{HierarchicalLZCoder, HierarchicalLZCoderOptions, LZCoder, LZCoderOptions},
    tokenizers::{BytePairEncoderOptions, Tokenizer},
    types::symbols_from_str,
};
use divan::{Bencher, black_box, counter::ItemsCount};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

type T = u32;

const VOCAB_SIZE: usize = 4096;

static PASSAGE: &str = "It was a bright cold day in April, and the clocks were striking \
    thirteen. The hallway smelt of boiled cabbage and old rag mats. At one end of it a \
    coloured poster, too large for indoor display, had been tacked to the wall. ";

static CORPUS: LazyLock<Vec<T>> = LazyLock::new(|| symbols_from_str(PASSAGE.repeat(40)));

fn byte_alphabet() -> impl Iterator<Item = T> {
    0..256
}

fn trained_lz() -> (LZCoder<T>, Vec<T>) {
    let mut coder = LZCoderOptions::new(Some(VOCAB_SIZE))
        .with_input_vocab(byte_alphabet())
        .init()
        .unwrap();
    let ids = coder.encode(&CORPUS, true).unwrap();
    (coder, ids)
}

fn trained_hierarchical() -> (HierarchicalLZCoder<T>, Vec<T>) {
    let mut coder = HierarchicalLZCoderOptions::new(Some(VOCAB_SIZE))
        .with_input_vocab(byte_alphabet())
        .init()
        .unwrap();
    let ids = coder.encode(&CORPUS, true).unwrap();
    (coder, ids)
}

mod lz {
    use super::*;

    #[divan::bench]
    fn learn(bencher: Bencher) {
        bencher
            .counter(ItemsCount::new(CORPUS.len()))
            .with_inputs(|| {
                LZCoderOptions::new(Some(VOCAB_SIZE))
                    .with_input_vocab(byte_alphabet())
                    .init()
                    .unwrap()
            })
            .bench_local_refs(|coder| coder.encode(black_box(&CORPUS), true).unwrap());
    }

    #[divan::bench]
    fn encode_known(bencher: Bencher) {
        let (coder, _) = trained_lz();
        bencher
            .counter(ItemsCount::new(CORPUS.len()))
            .bench(|| coder.encode_known(black_box(&CORPUS)).unwrap());
    }

    #[divan::bench]
    fn decode(bencher: Bencher) {
        let (coder, ids) = trained_lz();
        bencher
            .counter(ItemsCount::new(CORPUS.len()))
            .bench(|| coder.decode(black_box(&ids)).unwrap());
    }
}

mod hierarchical {
    use super::*;

    #[divan::bench]
    fn learn(bencher: Bencher) {
        bencher
            .counter(ItemsCount::new(CORPUS.len()))
            .with_inputs(|| {
                HierarchicalLZCoderOptions::new(Some(VOCAB_SIZE))
                    .with_input_vocab(byte_alphabet())
                    .init()
                    .unwrap()
            })
            .bench_local_refs(|coder| coder.encode(black_box(&CORPUS), true).unwrap());
    }

    #[divan::bench]
    fn decode(bencher: Bencher) {
        let (coder, ids) = trained_hierarchical();
        bencher
            .counter(ItemsCount::new(CORPUS.len()))
            .bench(|| coder.decode(black_box(&ids)).unwrap());
    }
}

mod bpe {
    use super::*;

    #[divan::bench]
    fn learn(bencher: Bencher) {
        bencher
            .counter(ItemsCount::new(CORPUS.len()))
            .with_inputs(|| {
                BytePairEncoderOptions::default()
                    .with_max_merges(256)
                    .init::<T>()
                    .unwrap()
            })
            .bench_local_refs(|encoder| encoder.learn(black_box(&CORPUS), None).unwrap());
    }

    #[divan::bench]
    fn encode(bencher: Bencher) {
        let mut encoder = BytePairEncoderOptions::default()
            .with_max_merges(256)
            .init::<T>()
            .unwrap();
        encoder.learn(&CORPUS, None).unwrap();
        bencher
            .counter(ItemsCount::new(CORPUS.len()))
            .bench(|| encoder.try_encode(black_box(&CORPUS)).unwrap());
    }
}
