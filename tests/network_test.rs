use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ferrite_fc::{LossType, Network, NetworkError, Node};

/// The 2-2-2 network from Matt Mazur's step-by-step backpropagation example.
fn worked_example() -> Network {
    let mut net = Network::new(&[2, 2, 2]).unwrap();

    net.layers[0].nodes[0] = Node::from_parts(vec![0.15, 0.20], 0.35);
    net.layers[0].nodes[1] = Node::from_parts(vec![0.25, 0.30], 0.35);

    net.layers[1].nodes[0] = Node::from_parts(vec![0.40, 0.45], 0.60);
    net.layers[1].nodes[1] = Node::from_parts(vec![0.50, 0.55], 0.60);

    net
}

const INPUT: [f64; 2] = [0.05, 0.10];
const TARGET: [f64; 2] = [0.01, 0.99];

#[test]
fn worked_example_forward_pass() {
    let mut net = worked_example();
    let prediction = net.predict(&INPUT).unwrap();

    assert_abs_diff_eq!(prediction[0], 0.7513650695, epsilon = 1e-9);
    assert_abs_diff_eq!(prediction[1], 0.7729284653, epsilon = 1e-9);
}

#[test]
fn worked_example_first_backward_pass() {
    let mut net = worked_example();
    net.predict(&INPUT).unwrap();
    let loss = net.backpropagate(&INPUT, &TARGET).unwrap();

    // (0.741365069^2 + 0.217071535^2) / 2
    assert_abs_diff_eq!(loss, 0.2983711088, epsilon = 1e-9);

    // dE/dw5 and dE/dw1 from the worked example (its error carries a 1/2).
    assert_abs_diff_eq!(net.layers[1].nodes[0].net_error[0], 0.082167041, epsilon = 1e-9);
    assert_abs_diff_eq!(net.layers[0].nodes[0].net_error[0], 0.000438568, epsilon = 1e-9);

    net.apply_gradients(0.5);
    assert_abs_diff_eq!(net.layers[1].nodes[0].weights[0], 0.35891648, epsilon = 1e-8);
    assert_abs_diff_eq!(net.layers[0].nodes[0].weights[0], 0.149780716, epsilon = 1e-9);
}

#[test]
fn worked_example_training_converges() {
    let mut net = worked_example();
    let loss = net
        .train(&[INPUT.to_vec()], &[TARGET.to_vec()], 0.5, 10_000)
        .unwrap();

    assert_abs_diff_eq!(loss, 3e-6, epsilon = 1e-6);

    let prediction = net.predict(&INPUT).unwrap();
    assert_abs_diff_eq!(prediction[0], TARGET[0], epsilon = 0.002);
    assert_abs_diff_eq!(prediction[1], TARGET[1], epsilon = 0.002);
}

#[test]
fn predict_is_idempotent() {
    let mut net = Network::with_rng(&[4, 5, 3], LossType::Mse, &mut StdRng::seed_from_u64(3)).unwrap();
    let input = [0.1, 0.2, 0.3, 0.4];
    let first = net.predict(&input).unwrap();
    let second = net.predict(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn predict_rejects_wrong_input_width() {
    let mut net = worked_example();
    assert!(matches!(
        net.predict(&[0.05, 0.10, 0.15]),
        Err(NetworkError::DimensionMismatch { .. })
    ));
}

#[test]
fn save_then_load_is_bit_identical() {
    let mut net = worked_example();
    net.train(&[INPUT.to_vec()], &[TARGET.to_vec()], 0.5, 10_000).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.json");
    net.save_json(&path).unwrap();
    let loaded = Network::load_json(&path).unwrap();

    assert_eq!(loaded.sizes, net.sizes);
    for (a, b) in net.layers.iter().zip(loaded.layers.iter()) {
        for (na, nb) in a.nodes.iter().zip(b.nodes.iter()) {
            let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
            assert_eq!(bits(&na.weights), bits(&nb.weights));
            assert_eq!(bits(&na.net_error), bits(&nb.net_error));
            assert_eq!(na.bias.to_bits(), nb.bias.to_bits());
            assert_eq!(na.delta.to_bits(), nb.delta.to_bits());
            assert_eq!(na.output.to_bits(), nb.output.to_bits());
        }
    }
    assert_eq!(loaded, net);
}

#[test]
fn random_weights_survive_a_stream_round_trip() {
    let net = Network::with_rng(&[6, 4, 3], LossType::CrossEntropy, &mut StdRng::seed_from_u64(77)).unwrap();
    let mut buf = Vec::new();
    net.save(&mut buf).unwrap();
    assert_eq!(Network::load(buf.as_slice()).unwrap(), net);
}

#[test]
fn loading_garbage_fails() {
    assert!(matches!(Network::load(&b"not json"[..]), Err(NetworkError::Decode(_))));
    assert!(matches!(
        Network::load(&br#"{"sizes":[2],"layers":[]}"#[..]),
        Err(NetworkError::Decode(_))
    ));
    let missing = tempfile::tempdir().unwrap().path().join("nope.json");
    assert!(matches!(Network::load_json(missing), Err(NetworkError::Io(_))));
}
