//! Narrative script: the text and scene keys shown in each state
//!
//! This is content, not logic. The machine consults it whenever a state is
//! entered; everything here is a pure function of `(state, context)`.

use crate::types::{context::NarrativeContext, context::Notification, state::NarrativeState};

/// What a state puts on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scene {
    pub text: &'static str,
    pub background: Option<&'static str>,
    pub character: Option<&'static str>,
}

const fn scene(
    text: &'static str,
    background: &'static str,
    character: Option<&'static str>,
) -> Scene {
    Scene {
        text,
        background: Some(background),
        character,
    }
}

/// Scene for `state`
pub fn scene_for(state: NarrativeState, ctx: &NarrativeContext) -> Scene {
    use NarrativeState as S;
    match state {
        S::Start => scene(
            "[系統]: 時間 23:47，加班結束。\n\
             [主角]: 終於下班了……車子就停在前面。\n\
             [動作]: 車門鎖卡住了，遙控鑰匙毫無反應。",
            "protagonist",
            Some("protagonist"),
        ),
        S::InCar => scene(
            "[動作]: 你用肩膀撞開車門，跌進駕駛座。\n\
             [車載智能]: 歡迎回來，駕駛。系統自檢完成。\n\
             [主角]: 拜託，這次一定要發動。",
            "car-interior",
            Some("protagonist"),
        ),
        S::QteSequence => scene(
            "[車載智能]: 點火程序需要手動校準。\n\
             [系統]: 請依序輸入方向指令！",
            "car-interior",
            None,
        ),
        S::EngineStall => scene(
            "[聲音]: 噗噗……咳……\n\
             [車載智能]: 引擎熄火，校準逾時。\n\
             [主角]: 不會吧……",
            "car-interior",
            Some("protagonist"),
        ),
        S::Driving => scene(
            "[車載智能]: 引擎啟動成功，目標：地下停車場。\n\
             [車載智能]: 距離閘門還有 {{drivingDistance}} 公分。\n\
             [系統]: 請專心駕駛。",
            "moving-car",
            None,
        ),
        S::AtGate => scene(
            "[動作]: 車子緩緩停在閘門前。\n\
             [車載智能]: 正在辨識車牌……",
            "railing-closed",
            None,
        ),
        S::GateOpening => scene(
            "[聲音]: 嗶——\n\
             [車載智能]: 車牌辨識成功，閘門開啟。",
            "railing-opening",
            None,
        ),
        S::Parked => scene(
            "[系統]: 已停車。\n\
             [主角]: 停車場裡好像有什麼東西……\n\
             一隻貓、一盤義大利麵，還有一道看不見盡頭的牆。",
            "parking-lot",
            Some("protagonist"),
        ),
        S::InteractCat => scene(
            "[動作]: 一隻白貓坐在柱子旁，直直盯著你。\n\
             [未知聲音]: O……I……I……A……",
            "street-cat",
            Some("street-cat"),
        ),
        S::InteractSpaghetti if ctx.has_spaghetti => scene(
            "[主角]: 義大利麵已經收進背包，盤子空空的。",
            "spaghetti-eaten",
            Some("spaghetti-eaten"),
        ),
        S::InteractSpaghetti => scene(
            "[動作]: 隔壁車的引擎蓋上放著一盤還在冒煙的義大利麵。\n\
             [主角]: 誰會把義大利麵放在停車場？",
            "spaghetti",
            Some("spaghetti"),
        ),
        S::InteractExit => scene(
            "[動作]: 你伸手觸碰停車場盡頭的牆，指尖傳來奇怪的震動。\n\
             [系統]: 警告：已到達地圖邊界。",
            "hand-touching",
            Some("hand-touching"),
        ),
        S::EndingBlackHole => scene(
            "[音樂]: OIIA OIIA OIIA\n\
             [動作]: 貓開始高速旋轉，整個停車場被吸進黑洞。\n\
             [系統]: 結局：黑洞",
            "oiia-cat",
            Some("oiia-cat"),
        ),
        S::EndingCatChaos => scene(
            "[動作]: 貓吞下義大利麵，開始分裂成無數隻。\n\
             [音樂]: 義大利麵 OIIA 混音版\n\
             [系統]: 結局：混亂",
            "oiia-cat",
            Some("oiia-cat"),
        ),
        S::EndingSpaghettiDance => scene(
            "[動作]: 你吃下義大利麵，身體不受控制地跳起舞來。\n\
             [系統]: 結局：熱舞",
            "spaghetti-dance",
            Some("spaghetti"),
        ),
        S::EndingAdmin => scene(
            "[神秘人]: 你不該碰那道牆的。\n\
             [神秘人]: 這個世界的管理員已經注意到你了。\n\
             [系統]: 結局：封鎖",
            "mysterious-man",
            Some("mysterious-man"),
        ),
        S::EndingBsod => scene(
            "[系統]: 偵測到駕駛長時間無動作。\n\
             [系統]: 致命錯誤 0x0000_OIIA\n\
             [系統]: 結局：當機",
            "blue-screen",
            None,
        ),
        S::PaymentNarrative => scene(
            "[系統]: 停車費用結算中……\n\
             [車載智能]: 本次停車產生的費用將以電子帳單寄送。",
            "parking-lot",
            None,
        ),
        S::PaymentInput => scene(
            "[系統]: 請輸入您的電子信箱以接收帳單。",
            "parking-lot",
            None,
        ),
        S::Finished => scene(
            "[系統]: 帳單已寄送至 {{email}}。\n\
             [主角]: ……停個車也太累了吧。\n\
             [系統]: 遊戲結束，感謝遊玩。",
            "parking-lot",
            Some("protagonist"),
        ),
    }
}

/// Put the scene for `state` into the context
pub fn enter(state: NarrativeState, ctx: &mut NarrativeContext) {
    let scene = scene_for(state, ctx);
    ctx.current_text = scene.text.to_string();
    ctx.background_image = scene.background.map(str::to_string);
    ctx.character_image = scene.character.map(str::to_string);
}

/// Log line appended when the story enters `state`
pub fn entry_log(state: NarrativeState) -> &'static str {
    use NarrativeState as S;
    match state {
        S::Start => "故事開始",
        S::InCar => "進入車內",
        S::QteSequence => "開始點火校準",
        S::EngineStall => "引擎熄火",
        S::Driving => "引擎啟動，開始駕駛",
        S::AtGate => "抵達停車場閘門",
        S::GateOpening => "閘門開啟",
        S::Parked => "停車完成",
        S::InteractCat => "查看貓咪",
        S::InteractSpaghetti => "查看義大利麵",
        S::InteractExit => "走向邊界",
        S::EndingBlackHole => "結局：黑洞",
        S::EndingCatChaos => "結局：混亂",
        S::EndingSpaghettiDance => "結局：熱舞",
        S::EndingAdmin => "結局：封鎖",
        S::EndingBsod => "結局：當機",
        S::PaymentNarrative => "進入繳費流程",
        S::PaymentInput => "輸入帳單信箱",
        S::Finished => "帳單已寄出，遊戲通關",
    }
}

pub const PICK_UP_LOG: &str = "獲得物品：義大利麵";

pub fn parked_notification() -> Notification {
    Notification::new("🅿️ 停車成功", "您的車輛已停入 B2 停車場，計費開始。")
}

pub fn item_notification() -> Notification {
    Notification::new("🎒 獲得物品", "義大利麵 x1")
}

pub fn bill_notification(email: &str) -> Notification {
    Notification::new("📧 帳單通知", format!("停車帳單已寄送至 {email}"))
}
