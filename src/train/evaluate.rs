use crate::error::{NetworkError, Result};
use crate::math::vector::argmax;
use crate::network::network::Network;

/// Number of samples whose predicted class (argmax of the output) matches
/// the argmax of the one-hot label.
pub fn count_correct(
    network: &mut Network,
    inputs: &[Vec<f64>],
    labels: &[Vec<f64>],
) -> Result<usize> {
    if inputs.len() != labels.len() {
        return Err(NetworkError::InvalidConfig(format!(
            "eval set has {} inputs but {} labels",
            inputs.len(),
            labels.len()
        )));
    }
    let mut correct = 0;
    for (input, label) in inputs.iter().zip(labels.iter()) {
        let output = network.predict(input)?;
        if argmax(&output) == argmax(label) {
            correct += 1;
        }
    }
    Ok(correct)
}

/// Fraction of samples classified correctly. An empty set scores 0.
pub fn accuracy(
    network: &mut Network,
    inputs: &[Vec<f64>],
    labels: &[Vec<f64>],
) -> Result<f64> {
    let correct = count_correct(network, inputs, labels)?;
    if inputs.is_empty() {
        return Ok(0.0);
    }
    Ok(correct as f64 / inputs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::node::Node;

    /// 2 -> 2 network whose output `j` copies input `j` (through a steep sigmoid).
    fn passthrough() -> Network {
        let mut net = Network::new(&[2, 2]).unwrap();
        net.layers[0].nodes[0] = Node::from_parts(vec![10.0, 0.0], 0.0);
        net.layers[0].nodes[1] = Node::from_parts(vec![0.0, 10.0], 0.0);
        net
    }

    #[test]
    fn counts_argmax_matches() {
        let mut net = passthrough();
        let inputs = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]];
        let labels = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0]];
        assert_eq!(count_correct(&mut net, &inputs, &labels).unwrap(), 2);
        let acc = accuracy(&mut net, &inputs, &labels).unwrap();
        assert!((acc - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn wrong_width_is_reported() {
        let mut net = passthrough();
        assert!(accuracy(&mut net, &[vec![1.0]], &[vec![1.0, 0.0]]).is_err());
    }
}
