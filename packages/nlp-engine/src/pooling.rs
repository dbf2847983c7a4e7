//! Pooling of token-level embeddings into a single sentence vector.

/// Smallest denominator used when dividing by the attention mask sum.
pub const MASK_SUM_EPSILON: f32 = 1e-9;

/// Mean pooling over the sequence dimension with attention mask.
///
/// ```text
/// pooled[i] = sum(hidden_states[t][i] * mask[t]) / max(sum(mask[t]), 1e-9)
/// ```
///
/// `token_embeddings` is `[seq_len][hidden_size]`. Rows beyond the mask length
/// count as padding. An empty input yields an empty vector.
pub fn mean_pool(token_embeddings: &[Vec<f32>], attention_mask: &[u32]) -> Vec<f32> {
    let hidden_size = match token_embeddings.first() {
        Some(row) => row.len(),
        None => return Vec::new(),
    };

    let mut summed = vec![0.0f32; hidden_size];
    let mut mask_sum = 0.0f32;

    for (row, &mask) in token_embeddings.iter().zip(attention_mask.iter()) {
        let weight = mask as f32;
        if weight == 0.0 {
            continue;
        }
        mask_sum += weight;
        for (acc, &value) in summed.iter_mut().zip(row.iter()) {
            *acc = value.mul_add(weight, *acc);
        }
    }

    let denominator = mask_sum.max(MASK_SUM_EPSILON);
    summed.into_iter().map(|v| v / denominator).collect()
}
