// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message template text.
//!
//! Placeholders: `{name}` for the player's first name, `{streak}` for the
//! streak length and `{shards}` for the referral reward.

pub const WELCOME: &str = "🔐 Welcome to DEC0D3, {name}!

DEC0D3 is a cyber-themed cipher puzzle game where you decode secret patterns.

🎯 Game Variants:
• HEX - Decode 4-digit color codes
• NUMERIC - Guess 5-digit numbers
• WORD - Find 5-letter English words

✨ Features:
• 📅 Daily challenges with streak tracking
• 🏆 Global leaderboards
• 💎 Earn shards, get AI hints
• 🤖 Powered by Gemini AI
• 🎁 Invite friends and earn +{shards} shards per referral!

Ready to test your decoding skills?
Click the button below to start playing! 👇";

/// Daily reminders for players with an active streak.
pub const STREAK: &[&str] = &[
    "⚡ SYSTEM BREACH DETECTED

Agent {name}, your neural link has been active for {streak} cycles.

New encrypted data packets await extraction. Daily security protocols require immediate attention.

Continue your streak. Decrypt the codes. 🔐",
    "🌐 NETWORK STATUS: ACTIVE

{name} | Streak: {streak} days | Status: ELITE

The grid never sleeps. Today's transmission contains critical intel. Your pattern recognition skills are needed.

Access the mainframe now ⚡",
    "🤖 NEURAL AI REPORT

Hello {name}. You've maintained cognitive sync for {streak} consecutive sessions.

Today's challenge matrix is loaded. The algorithms are waiting for your input. Don't let your streak flatline.

Engage protocols 🧠",
    "📡 INCOMING: Priority Signal

{name}, you're {streak} days deep in the simulation.

Today's ciphertext just dropped. The corporation doesn't rest, and neither should you. Decode before the window closes.

Stay connected 🔴",
    "👾 COLLECTIVE BROADCAST

{name} - {streak} day operative streak recorded.

New targets identified. Your decryption skills put you in the top tier. The puzzles won't solve themselves, agent.

Jack in 🎮",
    "💾 MEMORY FRAGMENT DETECTED

Agent {name}, {streak} continuous days logged in the archives.

Fresh data corruption needs your expertise. The hex, numeric, and word layers all require your touch. Time-sensitive.

Initialize sequence 🔍",
    "█▀▀ █▀█ █▀▄ █▀▀   █▀▄ █▀█ █▀█ █▀█
█▄▄ █▄█ █▄▀ ██▄   █▄▀ █▀▄ █▄█ █▀▀

{name} // STREAK: {streak} DAYS

New patterns emerged in the noise. Your presence is required for analysis. Don't break the chain.

>_ Execute now",
    "👁️ SURVEILLANCE DETECTED

{name}, you've been tracked for {streak} days straight.

They're watching your moves. Today's encrypted challenges are your only defense. Stay sharp, stay decoding, stay ahead.

Don't go dark now 🌙",
    "⛏️ CRYPTO MINING STATUS

Miner: {name} | Uptime: {streak} days

Fresh hash puzzles ready for processing. Your neural network performance has been exceptional. Keep the computational power flowing.

Mine the codes 💎",
    "🔮 REALITY.EXE UNSTABLE

{name}, the simulation recognizes your {streak}-day presence.

Today's glitches in the matrix reveal new patterns. Decode them before they vanish. The red pill is daily challenges.

Enter the void ⚡",
];

/// Daily reminders for players without a streak.
pub const NO_STREAK: &[&str] = &[
    "🌐 INITIALIZATION SEQUENCE

Welcome, Agent {name}.

The network has registered your presence. Daily operations begin now. Your first mission: decrypt today's data streams.

Start your streak. Prove your worth 🔐",
    "⚡ NEURAL LINK: RECONNECTING

{name}, systems are back online.

You've been offline too long. The codes are piling up. Today's your chance to re-establish your streak and climb the ranks.

Reboot complete. Deploy now 🤖",
    "📡 RECRUITMENT: ACTIVE

The collective needs decoders like you, {name}.

Fresh intel just hit the network. HEX signatures, NUMERIC sequences, WORD ciphers, all waiting. Start your operation today.

Join the elite 👾",
    "💾 NEW CHALLENGER DETECTED

{name}, your skills haven't been forgotten.

The system remembers your last session. Today's challenges are calling. Build your streak from zero. Show them you're still sharp.

Accept protocol? Y/N_ 🔍",
    "🔴 DATA LEAK IN PROGRESS

{name}, unauthorized access detected in sector 7.

Only elite decoders can patch the breach. Today's puzzles hold the key. Start your streak and secure the network.

Time is running out ⚡",
];

/// Fills `{streak}` before `{name}` so a name containing a placeholder is
/// left untouched.
pub fn render(template: &str, name: &str, streak: Option<u32>) -> String {
    let text = match streak {
        Some(streak) => template.replace("{streak}", &streak.to_string()),
        None => template.to_string(),
    };
    text.replace("{name}", name)
}
