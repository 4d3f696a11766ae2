use criterion::{criterion_group, criterion_main, Criterion};
use selfies::{decode, encode};

fn benchmark_codec(c: &mut Criterion) {
    let smiles_strings = vec![
        "CO",                                 // Simple molecule
        "C1=CC=CC=C1",                        // Benzene
        "C[C@H](O)[C@@H](O)C(=O)O",           // Lactic acid dimer fragment
        "C1CC1C(=O)O",                        // Cyclopropanecarboxylic acid
        "O=Cc1ccc(O)c(OC)c1COc1cc(C=O)ccc1O", // Vanilin
        "CC(=O)NCCC1=CNc2c1cc(OC)cc2CC(=O)NCCc1c[nH]c2ccc(OC)cc12", // Melatonin
        "CC(=O)OCCC(/C)=C\\C[C@H](C(C)=C)CCC=C", // a pheromone of the Californian scale insect
        "CC[C@H](O1)CC[C@@]12CCCO2",          // (2S,2R)-Chalgogran
        "OCCc1c(C)[n+](cs1)Cc2cnc(C)nc2N",    // Thiamine
    ];

    let selfies_strings: Vec<String> = smiles_strings
        .iter()
        .filter_map(|smiles| encode(smiles).ok())
        .collect();

    c.bench_function("encode_smiles", |b| {
        b.iter(|| {
            for smiles in &smiles_strings {
                let _ = encode(smiles);
            }
        });
    });

    c.bench_function("decode_selfies", |b| {
        b.iter(|| {
            for selfies in &selfies_strings {
                decode(selfies).unwrap();
            }
        });
    });
}

criterion_group!(benches, benchmark_codec);
criterion_main!(benches);
