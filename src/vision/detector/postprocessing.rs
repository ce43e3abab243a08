// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 output decoding and non-maximum suppression

use anyhow::Result;
use ndarray::{ArrayViewD, Ix3};

use super::coco;
use super::preprocessing::Letterbox;
use super::{BoundingBox, Detection};

/// Candidate box before class-name lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDetection {
    pub class_id: usize,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Decode a YOLOv8 head output into thresholded candidates.
///
/// Accepts `[1, 4 + classes, anchors]` (the default export) or the
/// transposed `[1, anchors, 4 + classes]`. Each anchor is `cx, cy, w, h`
/// followed by per-class scores.
pub fn decode_predictions(
    output: ArrayViewD<'_, f32>,
    threshold: f32,
    letterbox: &Letterbox,
) -> Result<Vec<RawDetection>> {
    let output = output
        .into_dimensionality::<Ix3>()
        .map_err(|_| anyhow::anyhow!("Unexpected detector output rank"))?;
    let (_, d1, d2) = output.dim();

    // Features are the smaller axis (84 for COCO vs 8400 anchors)
    let (features, anchors, transposed) = if d1 <= d2 { (d1, d2, false) } else { (d2, d1, true) };
    if features <= 4 {
        anyhow::bail!("Unexpected detector output shape: [1, {}, {}]", d1, d2);
    }
    let value = |f: usize, a: usize| {
        if transposed {
            output[[0, a, f]]
        } else {
            output[[0, f, a]]
        }
    };

    let mut candidates = Vec::new();
    for a in 0..anchors {
        let (class_id, confidence) = (4..features)
            .map(|f| (f - 4, value(f, a)))
            .fold((0, f32::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });

        if confidence.is_nan() || confidence < threshold {
            continue;
        }

        let (cx, cy, w, h) = (value(0, a), value(1, a), value(2, a), value(3, a));
        let (x1, y1) = letterbox.to_original(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.to_original(cx + w / 2.0, cy + h / 2.0);

        candidates.push(RawDetection {
            class_id,
            confidence,
            bbox: BoundingBox { x1, y1, x2, y2 },
        });
    }

    Ok(candidates)
}

/// Greedy per-class NMS; result is sorted by descending confidence
pub fn non_max_suppression(mut candidates: Vec<RawDetection>, iou_threshold: f32) -> Vec<RawDetection> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<RawDetection> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id && k.bbox.iou(&candidate.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}

/// Attach COCO names; unknown class ids are dropped
pub fn into_detections(raw: Vec<RawDetection>) -> Vec<Detection> {
    raw.into_iter()
        .filter_map(|r| {
            coco::class_name(r.class_id).map(|name| Detection {
                label: name.to_string(),
                confidence: r.confidence,
                bbox: Some(r.bbox),
            })
        })
        .collect()
}
