//! # Easing 模块
//!
//! 演出各阶段使用的时间插值函数。
//!
//! 所有函数对归一化时间 `t` 做 `[0,1]` 截断。

/// 线性插值
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    from + (to - from) * t
}

/// 平滑插值（两头慢中间快，Hermite 三次曲线）
pub fn smoothstep(from: f32, to: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let t = t * t * (3.0 - 2.0 * t);
    from + (to - from) * t
}

/// 三角脉冲：前半程 0→1，后半程 1→0
///
/// 闪光阶段单次脉冲的不透明度曲线。
pub fn triangle_pulse(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 { t * 2.0 } else { (1.0 - t) * 2.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 1.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 1.0, 0.5), 0.5);
        assert_eq!(lerp(0.0, 1.0, 1.0), 1.0);
        assert_eq!(lerp(1.0, 1.5, 0.5), 1.25);
    }

    #[test]
    fn test_lerp_clamps() {
        // 超出范围应该被截断
        assert_eq!(lerp(0.0, 2.0, -0.5), 0.0);
        assert_eq!(lerp(0.0, 2.0, 1.5), 2.0);
    }

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.5, 2.2, 0.0), 0.5);
        assert_eq!(smoothstep(0.5, 2.2, 1.0), 2.2);

        // 中点恰好是区间中点
        let mid = smoothstep(0.0, 1.0, 0.5);
        assert!((mid - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep_monotonic() {
        let mut last = smoothstep(0.0, 1.0, 0.0);
        for i in 1..=100 {
            let v = smoothstep(0.0, 1.0, i as f32 / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_triangle_pulse() {
        assert_eq!(triangle_pulse(0.0), 0.0);
        assert_eq!(triangle_pulse(0.25), 0.5);
        assert!((triangle_pulse(0.5) - 1.0).abs() < 1e-6);
        assert_eq!(triangle_pulse(0.75), 0.5);
        assert_eq!(triangle_pulse(1.0), 0.0);
    }
}
