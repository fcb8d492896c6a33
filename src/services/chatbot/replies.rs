//! Keyword sets and canned response families for the offline assistant.
//!
//! Rule priority lives in the dispatcher (`super`); this module only holds
//! the data. Keywords are matched as lowercase substrings.

/// Persona data surfaced by the about/skills/contact/projects families.
pub struct PersonalData {
    pub name: &'static str,
    pub nickname: &'static str,
    pub role: &'static str,
    pub status: &'static str,
    pub location: &'static str,
    pub github: &'static str,
    pub portfolio: &'static str,
    pub skills: &'static [&'static str],
}

pub const PERSONAL: PersonalData = PersonalData {
    name: "Fiqri Agustriawan",
    nickname: "Fiqri",
    role: "Web Developer",
    status: "Mahasiswa",
    location: "Indonesia",
    github: "https://github.com/FiqriAgustriawan",
    portfolio: "https://fiqriagustriawan.github.io",
    skills: &[
        "React",
        "Next.js",
        "TypeScript",
        "JavaScript",
        "HTML",
        "CSS",
        "Tailwind CSS",
    ],
};

pub const MATH_KEYWORDS: &[&str] = &[
    "calculate", "hitung", "math", "matematika", "plus", "minus", "tambah", "kurang", "kali",
    "bagi", "multiply", "divide", "+", "-", "*", "/", "=", "berapa", "hasil",
];

pub const MATH_RESPONSES: &[&str] = &[
    "Saya bisa bantu hitung! Coba ketik seperti \"hitung 5 + 3\" atau \"10 kali 2\".",
    "Butuh bantuan matematika? Coba tanya saya, contoh: \"berapa 5 + 5\" atau \"100 bagi 4\".",
    "Mau hitung apa? Ketik seperti \"hitung 20 tambah 30\" atau \"50 kurang 15\".",
];

pub const MATH_FACT_KEYWORDS: &[&str] = &[
    "math fact",
    "fakta matematika",
    "fun fact math",
    "fakta math",
];

pub const MATH_FACTS: &[&str] = &[
    "Tahukah kamu? Angka nol tidak bisa ditulis dalam angka Romawi.",
    "Fakta menarik: 111.111.111 x 111.111.111 = 12.345.678.987.654.321",
    "Fakta matematika: \"Googol\" adalah angka 1 diikuti 100 nol.",
    "Tahukah kamu? Angka 4 adalah satu-satunya angka yang jumlah hurufnya sama dengan nilainya (dalam bahasa Inggris: four = 4 huruf).",
    "Fakta unik: Jika kamu melipat kertas 42 kali, tebalnya akan mencapai bulan!",
];

pub const TIME_KEYWORDS: &[&str] = &[
    "time",
    "waktu",
    "jam berapa",
    "what time",
    "tanggal",
    "date",
    "hari ini",
    "today",
    "sekarang jam",
];

pub const STATUS_KEYWORDS: &[&str] = &[
    "how are you",
    "apa kabar",
    "gimana",
    "baik baik",
    "kabar",
    "sehat",
    "kondisi",
];

pub const STATUS_RESPONSES: &[&str] = &[
    "Saya baik-baik saja! Terima kasih sudah bertanya. Kamu sendiri gimana?",
    "Alhamdulillah baik! Siap membantu kamu hari ini.",
    "Saya selalu siap! Ada yang bisa saya bantu?",
    "Baik dong! Semoga kamu juga baik-baik saja.",
];

pub const GREETING_KEYWORDS: &[&str] = &[
    "hello", "hi", "hey", "halo", "hai", "hei", "good morning", "good afternoon",
    "good evening", "good night", "selamat pagi", "selamat siang", "selamat sore",
    "selamat malam", "assalamualaikum", "salam", "yo", "sup", "apa kabar", "gimana",
    "pagi", "siang", "sore", "malam",
];

pub const GREETING_RESPONSES: &[&str] = &[
    "Halo! Selamat datang di portfolio saya. Ada yang bisa saya bantu?",
    "Hai! Senang bertemu dengan kamu. Silakan tanya apa saja.",
    "Hey! Terima kasih sudah mampir. Mau tanya apa?",
    "Salam! Saya siap membantu. Ada yang ingin ditanyakan?",
    "Halo! Senang kamu ada di sini. Bagaimana saya bisa membantu?",
    "Waalaikumsalam! Ada yang bisa saya bantu hari ini?",
];

pub const FAREWELL_KEYWORDS: &[&str] = &[
    "bye", "goodbye", "see you", "later", "take care", "dadah", "sampai jumpa",
    "selamat tinggal", "bye bye", "pamit", "duluan", "cabut", "pergi dulu",
];

pub const FAREWELL_RESPONSES: &[&str] = &[
    "Sampai jumpa! Terima kasih sudah berkunjung. Datang lagi ya!",
    "Dadah! Senang bisa ngobrol denganmu.",
    "Sampai ketemu lagi! Jangan sungkan untuk kembali.",
    "Bye! Semoga harimu menyenangkan!",
    "Oke, sampai jumpa lagi! Sukses selalu!",
];

pub const ABOUT_KEYWORDS: &[&str] = &[
    "who are you", "siapa kamu", "about you", "tentang kamu", "introduce yourself",
    "perkenalkan diri", "tell me about yourself", "ceritakan tentang dirimu",
    "who is fiqri", "siapa fiqri", "kamu siapa", "ini siapa", "perkenalan", "kenalan",
];

pub const SKILLS_KEYWORDS: &[&str] = &[
    "skills", "keahlian", "kemampuan", "what can you do", "apa yang bisa kamu lakukan",
    "technologies", "teknologi", "programming", "coding", "tech stack", "bisa apa",
    "jago apa", "skill", "abilities",
];

pub const CONTACT_KEYWORDS: &[&str] = &[
    "contact", "kontak", "hubungi", "email", "reach", "how to contact",
    "bagaimana menghubungi", "social media", "sosmed", "dm", "chat",
    "kenalan lebih lanjut",
];

pub const PROJECT_KEYWORDS: &[&str] = &[
    "project", "proyek", "portfolio", "work", "karya", "what have you built",
    "apa yang sudah kamu buat", "hasil kerja", "contoh", "bikin apa", "buat apa",
];

fn about_me() -> String {
    format!(
        "Saya {}, seorang {} dan {} dari {}. Saya fokus membangun aplikasi web yang modern dan responsif menggunakan teknologi seperti React, Next.js, dan TypeScript. Saat ini sedang terus belajar untuk meningkatkan skill dan menciptakan pengalaman digital yang berdampak.",
        PERSONAL.name, PERSONAL.role, PERSONAL.status, PERSONAL.location
    )
}

pub fn about_responses() -> Vec<String> {
    vec![
        about_me(),
        format!(
            "Saya {}, seorang {} dari {}. Saya suka membangun aplikasi web!",
            PERSONAL.name, PERSONAL.role, PERSONAL.location
        ),
        format!(
            "Nama saya {}. Saat ini saya {} sekaligus {}, sangat tertarik dalam menciptakan pengalaman digital yang keren.",
            PERSONAL.name, PERSONAL.status, PERSONAL.role
        ),
        format!(
            "Perkenalkan, saya {}! Seorang {} yang fokus di pengembangan web modern.",
            PERSONAL.nickname, PERSONAL.role
        ),
    ]
}

pub fn skills_responses() -> Vec<String> {
    let all = PERSONAL.skills.join(", ");
    let first_three = PERSONAL
        .skills
        .iter()
        .take(3)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    let first_four = PERSONAL
        .skills
        .iter()
        .take(4)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        format!("Skill saya meliputi: {all}. Saya selalu belajar teknologi baru!"),
        format!("Saya bekerja dengan {first_three} dan teknologi web modern lainnya."),
        format!("Sebagai developer, saya menguasai {all}."),
        format!("Keahlian utama saya adalah {first_four}. Selalu semangat untuk terus berkembang!"),
    ]
}

pub fn contact_responses() -> Vec<String> {
    vec![
        format!(
            "Kamu bisa menghubungi saya melalui:\n- GitHub: {}\n- Portfolio: {}",
            PERSONAL.github, PERSONAL.portfolio
        ),
        format!("Silakan connect dengan saya di GitHub: {}", PERSONAL.github),
        format!(
            "Cek portfolio saya di {} untuk info lebih lanjut!",
            PERSONAL.portfolio
        ),
        format!(
            "Mau lebih kenal? Kunjungi portfolio saya di {} atau GitHub saya!",
            PERSONAL.portfolio
        ),
    ]
}

pub fn project_responses() -> Vec<String> {
    vec![
        format!(
            "Kamu bisa lihat proyek dan portfolio saya di {}. Saya fokus membangun aplikasi web menggunakan React dan Next.js.",
            PERSONAL.portfolio
        ),
        format!(
            "Saya sudah mengerjakan berbagai proyek web development. Cek di {}!",
            PERSONAL.github
        ),
        "Saya fokus membangun aplikasi web yang modern dan responsif. Kunjungi portfolio saya untuk detail lebih lanjut!".to_string(),
        format!(
            "Beberapa proyek saya bisa dilihat di GitHub: {}. Kebanyakan menggunakan React dan Next.js.",
            PERSONAL.github
        ),
    ]
}

pub const WEATHER_KEYWORDS: &[&str] = &[
    "weather", "cuaca", "rain", "hujan", "sunny", "cerah", "how is the weather",
    "bagaimana cuaca", "is it raining", "mendung", "panas", "dingin", "gerimis",
];

pub const WEATHER_RESPONSES: &[&str] = &[
    "Cuaca hari ini terlihat bagus! Cocok untuk coding.",
    "Sepertinya cerah dan menyenangkan. Hari yang baik untuk produktif!",
    "Cuacanya lumayan nih. Semoga harimu menyenangkan!",
    "Semoga cuaca di tempatmu baik-baik saja hari ini!",
    "Entah hujan atau cerah, yang penting semangat ngoding!",
];

pub const THANK_KEYWORDS: &[&str] = &[
    "thank", "thanks", "terima kasih", "makasih", "thx", "ty", "appreciate",
    "grateful", "tengkyu", "tks", "trims",
];

pub const THANK_RESPONSES: &[&str] = &[
    "Sama-sama! Senang bisa membantu.",
    "Tidak masalah! Tanya lagi kalau ada yang diperlukan.",
    "Senang bisa membantu! Jangan sungkan untuk bertanya lagi.",
    "Dengan senang hati! Ada lagi yang ingin ditanyakan?",
    "Oke, sama-sama! Semoga bermanfaat ya.",
];

pub const HELP_KEYWORDS: &[&str] = &[
    "help", "bantuan", "tolong", "assist", "guide", "what can you do",
    "apa yang bisa kamu lakukan", "how to use", "cara pakai", "bisa apa aja", "fitur",
];

pub const HELP_RESPONSES: &[&str] = &[
    "Saya bisa membantu kamu dengan:\n- Informasi tentang Fiqri\n- Skills dan teknologi\n- Info kontak\n- Kalkulasi sederhana\n- Obrolan umum",
    "Tanya saja tentang latar belakang Fiqri, skills, proyek, atau sekadar ngobrol santai!",
    "Saya di sini untuk memberikan info tentang portfolio ini. Tanya tentang skills, proyek, atau cara menghubungi Fiqri.",
    "Mau tanya apa? Bisa tentang profil, kemampuan, proyek, atau mau ngobrol santai juga boleh!",
];

pub const JOKE_KEYWORDS: &[&str] = &[
    "joke", "funny", "humor", "lucu", "lelucon", "bercanda", "make me laugh",
    "tell me a joke", "jokes", "lawak",
];

pub const JOKE_RESPONSES: &[&str] = &[
    "Kenapa programmer suka dark mode? Karena terang menarik bugs!",
    "Kenapa developer bangkrut? Karena dia kehabisan cache.",
    "SQL statement masuk ke bar, menghampiri dua table dan bertanya \"Boleh saya join?\"",
    "Ada 10 jenis orang di dunia: yang mengerti binary dan yang tidak.",
    "!false - Lucu karena itu true.",
    "Programmer itu seperti koki. Bedanya, kalau masakan gagal, dia console.log(\"kenapa sih?\").",
];

pub const DEFAULT_RESPONSES: &[&str] = &[
    "Hmm, saya kurang mengerti. Bisa diulangi dengan kata lain?",
    "Menarik! Ceritakan lebih lanjut atau coba tanya tentang skills, proyek, atau latar belakang saya.",
    "Saya tidak terlalu paham. Kamu bisa tanya tentang skills Fiqri, proyek, atau info kontak.",
    "Maaf, saya tidak yakin bagaimana merespons itu. Coba tanya hal lain!",
    "Bisa dijelaskan lebih detail? Saya bisa bantu info tentang Fiqri, kalkulasi, atau ngobrol santai.",
    "Hmm, coba tanya yang lain ya. Misalnya tentang skills, proyek, atau mau ngobrol santai.",
];
