use ferrite_fc::Network;

fn main() -> ferrite_fc::Result<()> {
    let mut network = Network::new(&[2, 3, 1])?;

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ];

    for round in 0..10 {
        let loss = network.train(&inputs, &expected_outputs, 0.5, 1000)?;
        println!("Epoch {}: loss = {loss:.6}", (round + 1) * 1000);
    }

    for input in &inputs {
        println!("Input: {:?} -> Output: {:.4}", input, network.predict(input)?[0]);
    }
    Ok(())
}
